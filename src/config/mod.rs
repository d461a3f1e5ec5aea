pub mod cli;
pub mod toml_config;

use crate::core::SettlementSettings;
#[cfg(feature = "cli")]
use crate::domain::model::RateConfiguration;
#[cfg(feature = "cli")]
use crate::utils::error::CommissionError;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
use toml_config::AppConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "salon-commission")]
#[command(about = "Commission split calculator and rate configuration tool for salons")]
pub struct CliConfig {
    #[arg(long, default_value = "commission.toml", help = "Path to TOML configuration file")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the BASIC, PREMIUM and ELITE rate cards
    Presets,
    /// Split one amount
    Calculate {
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        #[command(flatten)]
        source: RateSource,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored configuration of a salon
    Show {
        #[arg(long)]
        salon: String,
    },
    /// Store custom rates (percentages) for a salon
    Set {
        #[arg(long)]
        salon: String,
        #[command(flatten)]
        rates: PercentRates,
        #[arg(long, default_value = "custom")]
        name: String,
        #[arg(long)]
        expected_version: Option<u64>,
    },
    /// Replace a salon's rates with a tier preset
    ApplyPreset {
        #[arg(long)]
        salon: String,
        #[arg(long)]
        tier: String,
        #[arg(long)]
        expected_version: Option<u64>,
    },
    /// Split every booking of a CSV file and write settlement reports
    Settle {
        #[arg(long)]
        input: String,
        #[command(flatten)]
        source: RateSource,
        #[arg(long)]
        output: Option<String>,
    },
}

/// Where the rates for a calculation come from. With nothing set, the
/// configured default tier is used.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct RateSource {
    /// Use a tier preset
    #[arg(long, conflicts_with = "salon")]
    pub tier: Option<String>,
    /// Use the salon's stored configuration
    #[arg(long)]
    pub salon: Option<String>,
    /// Platform fee in percent
    #[arg(long, conflicts_with_all = ["tier", "salon"])]
    pub platform: Option<f64>,
    /// Salon commission in percent
    #[arg(long, conflicts_with_all = ["tier", "salon"])]
    pub salon_rate: Option<f64>,
    /// Professional earnings in percent
    #[arg(long, conflicts_with_all = ["tier", "salon"])]
    pub professional: Option<f64>,
}

#[cfg(feature = "cli")]
impl RateSource {
    /// Explicit percentages, when all three were given.
    pub fn custom(&self) -> Result<Option<PercentRates>> {
        match (self.platform, self.salon_rate, self.professional) {
            (Some(platform), Some(salon_rate), Some(professional)) => Ok(Some(PercentRates {
                platform,
                salon_rate,
                professional,
            })),
            (None, None, None) => Ok(None),
            _ => Err(CommissionError::MissingConfigError {
                field: "--platform, --salon-rate and --professional must be given together"
                    .to_string(),
            }),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Args)]
pub struct PercentRates {
    /// Platform fee in percent
    #[arg(long)]
    pub platform: f64,
    /// Salon commission in percent
    #[arg(long)]
    pub salon_rate: f64,
    /// Professional earnings in percent
    #[arg(long)]
    pub professional: f64,
}

#[cfg(feature = "cli")]
impl PercentRates {
    pub fn to_rates(&self) -> RateConfiguration {
        RateConfiguration::from_percentages(self.platform, self.salon_rate, self.professional)
    }
}

/// Settings of one settlement run, resolved from the config file and command line.
#[derive(Debug, Clone)]
pub struct SettlementJob {
    pub input_path: String,
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub skip_invalid_rows: bool,
    pub tolerance: f64,
}

impl SettlementJob {
    pub fn from_config(config: &AppConfig, input_path: String, output_path: Option<String>) -> Self {
        Self {
            input_path,
            output_path: output_path.unwrap_or_else(|| config.settlement.output_path.clone()),
            output_formats: config.settlement.output_formats.clone(),
            skip_invalid_rows: config.settlement.skip_invalid_rows,
            tolerance: config.commission.tolerance,
        }
    }
}

impl SettlementSettings for SettlementJob {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn skip_invalid_rows(&self) -> bool {
        self.skip_invalid_rows
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Validate for SettlementJob {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path)?;
        validate_path("output", &self.output_path)?;
        Ok(())
    }
}
