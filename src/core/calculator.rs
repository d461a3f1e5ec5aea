use crate::domain::model::{CommissionBreakdown, RateConfiguration, DEFAULT_TOLERANCE};
use crate::utils::error::{CommissionError, Result};

/// Splits amounts according to a [`RateConfiguration`].
///
/// Stateless apart from the tolerance used to accept a configuration, so a
/// single instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionCalculator {
    tolerance: f64,
}

impl Default for CommissionCalculator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl CommissionCalculator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Fails with `InvalidAmount` for negative or non-finite amounts and with
    /// `InvalidConfiguration`/`InvalidRate` when the rates do not partition the amount.
    pub fn calculate(
        &self,
        total_amount: f64,
        config: &RateConfiguration,
    ) -> Result<CommissionBreakdown> {
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(CommissionError::InvalidAmount {
                amount: total_amount,
            });
        }
        config.validate(self.tolerance)?;

        // adding +0.0 turns -0.0 into 0.0
        let total_amount = total_amount + 0.0;
        let breakdown = CommissionBreakdown {
            total_amount,
            platform_fee: total_amount * config.platform_fee_rate + 0.0,
            salon_commission: total_amount * config.salon_commission_rate + 0.0,
            professional_earnings: total_amount * config.professional_commission_rate + 0.0,
            rates: *config,
        };

        tracing::trace!(
            total_amount,
            platform_fee = breakdown.platform_fee,
            salon_commission = breakdown.salon_commission,
            professional_earnings = breakdown.professional_earnings,
            "Calculated commission breakdown"
        );

        Ok(breakdown)
    }
}

/// Two-decimal rendering used by the CLI and settlement reports.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Tier;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_calculate_premium_split() {
        let config = RateConfiguration::new(0.12, 0.23, 0.65);
        let breakdown = CommissionCalculator::default()
            .calculate(100.0, &config)
            .unwrap();

        assert_close(breakdown.platform_fee, 12.0);
        assert_close(breakdown.salon_commission, 23.0);
        assert_close(breakdown.professional_earnings, 65.0);
        assert_eq!(breakdown.total_amount, 100.0);
        assert_eq!(breakdown.rates, config);
    }

    #[test]
    fn test_zero_amount_is_accepted() {
        let breakdown = CommissionCalculator::default()
            .calculate(0.0, &Tier::Basic.rates())
            .unwrap();

        assert_eq!(breakdown.platform_fee, 0.0);
        assert_eq!(breakdown.salon_commission, 0.0);
        assert_eq!(breakdown.professional_earnings, 0.0);
    }

    #[test]
    fn test_negative_zero_prints_as_zero() {
        let breakdown = CommissionCalculator::default()
            .calculate(-0.0, &Tier::Basic.rates())
            .unwrap();

        for value in [
            breakdown.total_amount,
            breakdown.platform_fee,
            breakdown.salon_commission,
            breakdown.professional_earnings,
        ] {
            assert!(value.is_sign_positive());
            assert_eq!(format_amount(value), "0.00");
        }

        let json = serde_json::to_string(&breakdown).unwrap();
        assert!(json.contains("\"totalAmount\":0.0"));
        assert!(!json.contains("-0.0"));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = CommissionCalculator::default()
            .calculate(-1.0, &Tier::Basic.rates())
            .unwrap_err();
        assert!(matches!(err, CommissionError::InvalidAmount { amount } if amount == -1.0));

        let err = CommissionCalculator::default()
            .calculate(f64::INFINITY, &Tier::Basic.rates())
            .unwrap_err();
        assert!(matches!(err, CommissionError::InvalidAmount { .. }));
    }

    #[test]
    fn test_inconsistent_configuration_is_rejected() {
        let config = RateConfiguration::new(0.15, 0.25, 0.70);
        let err = CommissionCalculator::default()
            .calculate(100.0, &config)
            .unwrap_err();
        assert!(matches!(err, CommissionError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_wider_tolerance_accepts_rounded_percentages() {
        // 33.33 / 33.33 / 33.33 leaves 0.01% unassigned
        let config = RateConfiguration::from_percentages(33.33, 33.33, 33.33);
        assert!(CommissionCalculator::default().calculate(90.0, &config).is_err());
        assert!(CommissionCalculator::new(1e-3).calculate(90.0, &config).is_ok());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(25.05), "25.05");
        assert_eq!(format_amount(12.0), "12.00");
        assert_eq!(format_amount(0.0), "0.00");
    }
}
