pub mod calculator;
pub mod engine;
pub mod presets;
pub mod service;
pub mod settlement;
pub mod store;

pub use crate::domain::model::{
    Booking, CommissionBreakdown, RateConfiguration, SettlementResult, StoredConfiguration, Tier,
};
pub use crate::domain::ports::{ConfigurationStore, Pipeline, SettlementSettings, Storage};
pub use crate::utils::error::Result;
