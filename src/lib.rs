pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::AppConfig, SettlementJob};

pub use crate::core::{
    calculator::{format_amount, CommissionCalculator},
    engine::{SettlementEngine, SettlementReport},
    presets::{TierPreset, TierPresetCatalog},
    service::CommissionService,
    settlement::SettlementPipeline,
    store::RepositoryStore,
};
pub use domain::model::{
    CommissionBreakdown, RateConfiguration, StoredConfiguration, Tier, DEFAULT_TOLERANCE,
};
pub use utils::error::{CommissionError, Result};
