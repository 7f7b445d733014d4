// 调度器模块
pub mod task_scheduler;

// 重新导出
pub use task_scheduler::*;
