use crate::core::calculator::CommissionCalculator;
use crate::core::presets::TierPresetCatalog;
use crate::core::ConfigurationStore;
use crate::domain::model::{CommissionBreakdown, RateConfiguration, StoredConfiguration, Tier};
use crate::utils::error::{CommissionError, Result};

/// Ties a salon's stored configuration to the calculator.
pub struct CommissionService<S: ConfigurationStore> {
    store: S,
    calculator: CommissionCalculator,
    fallback: RateConfiguration,
}

impl<S: ConfigurationStore> CommissionService<S> {
    /// `fallback` applies to salons that have never saved a configuration.
    pub fn new(store: S, calculator: CommissionCalculator, fallback: RateConfiguration) -> Self {
        Self {
            store,
            calculator,
            fallback,
        }
    }

    pub fn calculator(&self) -> &CommissionCalculator {
        &self.calculator
    }

    pub fn fallback(&self) -> RateConfiguration {
        self.fallback
    }

    pub async fn stored(&self, salon_id: &str) -> Result<StoredConfiguration> {
        self.store
            .load(salon_id)
            .await?
            .ok_or_else(|| CommissionError::ConfigurationNotFound {
                salon_id: salon_id.to_string(),
            })
    }

    pub async fn active_rates(&self, salon_id: &str) -> Result<RateConfiguration> {
        match self.store.load(salon_id).await? {
            Some(stored) => Ok(stored.rates),
            None => {
                tracing::debug!("Salon {} has no stored rates, using fallback", salon_id);
                Ok(self.fallback)
            }
        }
    }

    pub async fn calculate_for_salon(
        &self,
        salon_id: &str,
        total_amount: f64,
    ) -> Result<CommissionBreakdown> {
        let rates = self.active_rates(salon_id).await?;
        self.calculator.calculate(total_amount, &rates)
    }

    pub async fn update_rates(
        &self,
        salon_id: &str,
        name: &str,
        rates: RateConfiguration,
        expected_version: Option<u64>,
    ) -> Result<StoredConfiguration> {
        rates.validate(self.calculator.tolerance())?;
        self.store
            .save(salon_id, name, rates, expected_version)
            .await
    }

    /// Overwrites all three rates of the salon with the named tier.
    pub async fn apply_preset(
        &self,
        salon_id: &str,
        tier_name: &str,
        expected_version: Option<u64>,
    ) -> Result<StoredConfiguration> {
        let tier: Tier = tier_name.parse()?;
        self.store
            .save(salon_id, tier.name(), tier.rates(), expected_version)
            .await
    }

    /// Picks the rates for a one-off calculation from at most one source:
    /// a tier preset, a salon's stored rates, or explicit custom rates.
    /// With no source the fallback applies.
    pub async fn resolve_rates(
        &self,
        tier: Option<&str>,
        salon_id: Option<&str>,
        custom: Option<RateConfiguration>,
    ) -> Result<RateConfiguration> {
        match (tier, salon_id, custom) {
            (Some(tier), None, None) => TierPresetCatalog::apply_preset(tier),
            (None, Some(salon_id), None) => self.active_rates(salon_id).await,
            (None, None, Some(custom)) => Ok(custom),
            (None, None, None) => Ok(self.fallback),
            _ => Err(CommissionError::ConfigValidationError {
                field: "rates".to_string(),
                message: "Pick one of --tier, --salon or explicit percentages".to_string(),
            }),
        }
    }
}
