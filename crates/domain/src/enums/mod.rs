//! 业务枚举模块

pub mod instrument_class;

pub use instrument_class::InstrumentClass;
