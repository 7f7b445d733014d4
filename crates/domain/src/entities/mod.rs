//! 业务实体模块

pub mod account;
pub mod holding;
pub mod quote_record;
pub mod snapshot;
pub mod trigger;

pub use account::{AccountBook, Advisor, Client, HoldingOwner, Manager};
pub use holding::{Alert, Holding};
pub use quote_record::{PriceBar, QuoteRecord, SustainabilityScores};
pub use snapshot::Snapshot;
pub use trigger::TriggeredAlert;
