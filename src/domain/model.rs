use crate::utils::error::{CommissionError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when checking that the three rates cover the whole amount.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// How a booking amount is partitioned between platform, salon and professional.
///
/// Rates are fractions, not percentages. Serialized with the camelCase keys the
/// configuration endpoint uses (`platformFeeRate`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateConfiguration {
    pub platform_fee_rate: f64,
    pub salon_commission_rate: f64,
    pub professional_commission_rate: f64,
}

impl RateConfiguration {
    /// Builds a configuration as-is. Use [`RateConfiguration::validate`] to check it.
    pub fn new(
        platform_fee_rate: f64,
        salon_commission_rate: f64,
        professional_commission_rate: f64,
    ) -> Self {
        Self {
            platform_fee_rate,
            salon_commission_rate,
            professional_commission_rate,
        }
    }

    /// 由百分比建立設定，每個值先夾在 0 到 100 之間再除以 100
    pub fn from_percentages(platform_fee: f64, salon_commission: f64, professional: f64) -> Self {
        let to_fraction = |percent: f64| percent.clamp(0.0, 100.0) / 100.0;
        Self::new(
            to_fraction(platform_fee),
            to_fraction(salon_commission),
            to_fraction(professional),
        )
    }

    pub fn sum(&self) -> f64 {
        self.platform_fee_rate + self.salon_commission_rate + self.professional_commission_rate
    }

    pub fn is_consistent(&self, tolerance: f64) -> bool {
        (self.sum() - 1.0).abs() <= tolerance
    }

    /// Rejects rates outside [0,1] and sums that do not reach 1.0 within `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CommissionError::InvalidRate {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !self.is_consistent(tolerance) {
            return Err(CommissionError::InvalidConfiguration {
                sum: self.sum(),
                tolerance,
            });
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, f64); 3] {
        [
            ("platformFeeRate", self.platform_fee_rate),
            ("salonCommissionRate", self.salon_commission_rate),
            ("professionalCommissionRate", self.professional_commission_rate),
        ]
    }
}

impl Default for RateConfiguration {
    fn default() -> Self {
        Tier::Basic.rates()
    }
}

impl fmt::Display for RateConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "platform {:.2}% / salon {:.2}% / professional {:.2}%",
            self.platform_fee_rate * 100.0,
            self.salon_commission_rate * 100.0,
            self.professional_commission_rate * 100.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Basic,
    Premium,
    Elite,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Premium, Tier::Elite];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Basic => "BASIC",
            Tier::Premium => "PREMIUM",
            Tier::Elite => "ELITE",
        }
    }

    pub fn rates(&self) -> RateConfiguration {
        match self {
            Tier::Basic => RateConfiguration::new(0.15, 0.25, 0.60),
            Tier::Premium => RateConfiguration::new(0.12, 0.23, 0.65),
            Tier::Elite => RateConfiguration::new(0.10, 0.20, 0.70),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of splitting one amount. Full precision; round only for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionBreakdown {
    pub total_amount: f64,
    pub platform_fee: f64,
    pub salon_commission: f64,
    pub professional_earnings: f64,
    #[serde(flatten)]
    pub rates: RateConfiguration,
}

impl CommissionBreakdown {
    pub fn distributed(&self) -> f64 {
        self.platform_fee + self.salon_commission + self.professional_earnings
    }
}

/// The active configuration of one salon as persisted by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfiguration {
    pub salon_id: String,
    pub name: String,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub rates: RateConfiguration,
}

/// One row of a settlement input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLine {
    pub booking_id: String,
    #[serde(flatten)]
    pub breakdown: CommissionBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTotals {
    pub bookings: usize,
    pub skipped: usize,
    pub total_amount: f64,
    pub platform_fee: f64,
    pub salon_commission: f64,
    pub professional_earnings: f64,
}

impl SettlementTotals {
    pub fn add(&mut self, breakdown: &CommissionBreakdown) {
        self.bookings += 1;
        self.total_amount += breakdown.total_amount;
        self.platform_fee += breakdown.platform_fee;
        self.salon_commission += breakdown.salon_commission;
        self.professional_earnings += breakdown.professional_earnings;
    }
}

#[derive(Debug, Clone)]
pub struct SettlementResult {
    pub rates: RateConfiguration,
    pub lines: Vec<SettlementLine>,
    pub totals: SettlementTotals,
}
