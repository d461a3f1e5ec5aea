use crate::domain::model::{RateConfiguration, Tier};
use crate::utils::error::{CommissionError, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPreset {
    pub tier: Tier,
    pub rates: RateConfiguration,
}

impl FromStr for Tier {
    type Err = CommissionError;

    fn from_str(name: &str) -> Result<Self> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CommissionError::UnknownPreset {
                name: name.to_string(),
            })
    }
}

/// The fixed BASIC / PREMIUM / ELITE rate cards.
pub struct TierPresetCatalog;

impl TierPresetCatalog {
    /// Always the three tiers, in BASIC, PREMIUM, ELITE order.
    pub fn list_presets() -> Vec<TierPreset> {
        Tier::ALL
            .into_iter()
            .map(|tier| TierPreset {
                tier,
                rates: tier.rates(),
            })
            .collect()
    }

    /// Returns a fresh copy of the named preset's rates.
    pub fn apply_preset(name: &str) -> Result<RateConfiguration> {
        let tier: Tier = name.parse()?;
        tracing::debug!("Applying {} tier preset", tier);
        Ok(tier.rates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DEFAULT_TOLERANCE;

    #[test]
    fn test_list_presets_order_and_consistency() {
        let presets = TierPresetCatalog::list_presets();
        let names: Vec<&str> = presets.iter().map(|p| p.tier.name()).collect();

        assert_eq!(names, vec!["BASIC", "PREMIUM", "ELITE"]);
        for preset in &presets {
            assert!(preset.rates.is_consistent(DEFAULT_TOLERANCE), "{}", preset.tier);
        }
    }

    #[test]
    fn test_apply_preset_is_case_insensitive() {
        assert_eq!(
            TierPresetCatalog::apply_preset("elite").unwrap(),
            RateConfiguration::new(0.10, 0.20, 0.70)
        );
        assert_eq!(
            TierPresetCatalog::apply_preset(" Premium ").unwrap(),
            Tier::Premium.rates()
        );
    }

    #[test]
    fn test_unknown_preset() {
        let err = TierPresetCatalog::apply_preset("PLATINUM").unwrap_err();
        assert!(matches!(err, CommissionError::UnknownPreset { ref name } if name == "PLATINUM"));
        assert!("".parse::<Tier>().is_err());
    }
}
