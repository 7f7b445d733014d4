//! 行情源适配器

pub mod yahoo;

pub use yahoo::{YahooConfig, YahooQuoteSource};
