//! Elephant bar detector
//!
//! An elephant bar is a momentum candle: its range clears an ATR-multiple
//! floor and its body dominates that range. Direction follows the close.

use super::clears_atr_floor;
use crate::{BarType, Ohlc, OhlcExt, Percent};

/// Elephant bar detection parameters
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElephantConfig {
    pub enabled: bool,
    /// Minimum candle range as an ATR multiple
    pub min_size: f64,
    /// Minimum body size as a percentage of range
    pub body_percent: Percent,
}

impl Default for ElephantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_size: 1.3,
            body_percent: Percent::new_const(70.0),
        }
    }
}

/// Detect an elephant bar.
///
/// Zero-range bars have no defined body percentage and never match.
pub fn detect<T: Ohlc>(bar: &T, atr: f64, config: &ElephantConfig) -> Option<BarType> {
    if !clears_atr_floor(bar.range(), config.min_size, atr) {
        return None;
    }

    let body_percent = bar.body_percent()?;
    if body_percent < config.body_percent.get() {
        return None;
    }

    Some(if bar.is_bullish() {
        BarType::BullishElephant
    } else {
        BarType::BearishElephant
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bar(f64, f64, f64, f64);

    impl Ohlc for Bar {
        fn open(&self) -> f64 {
            self.0
        }

        fn high(&self) -> f64 {
            self.1
        }

        fn low(&self) -> f64 {
            self.2
        }

        fn close(&self) -> f64 {
            self.3
        }
    }

    #[test]
    fn test_bullish_elephant() {
        // range 12 >= 1.3 * 5, body 10/12 = 83.3% >= 70%
        let bar = Bar(100.0, 111.0, 99.0, 110.0);
        let config = ElephantConfig::default();
        assert_eq!(
            detect(&bar, 5.0, &config),
            Some(BarType::BullishElephant)
        );
    }

    #[test]
    fn test_bearish_elephant() {
        let bar = Bar(110.0, 111.0, 99.0, 100.0);
        let config = ElephantConfig::default();
        assert_eq!(
            detect(&bar, 5.0, &config),
            Some(BarType::BearishElephant)
        );
    }

    #[test]
    fn test_small_range_rejected() {
        // range 12 < 1.3 * 10
        let bar = Bar(100.0, 111.0, 99.0, 110.0);
        let config = ElephantConfig::default();
        assert_eq!(detect(&bar, 10.0, &config), None);
    }

    #[test]
    fn test_small_body_rejected() {
        // body 2/12 = 16.7% < 70%
        let bar = Bar(100.0, 111.0, 99.0, 102.0);
        let config = ElephantConfig::default();
        assert_eq!(detect(&bar, 5.0, &config), None);
    }

    #[test]
    fn test_zero_range_never_matches() {
        let bar = Bar(100.0, 100.0, 100.0, 100.0);
        let config = ElephantConfig {
            min_size: 0.1,
            body_percent: Percent::new_const(0.1),
            ..ElephantConfig::default()
        };
        assert_eq!(detect(&bar, 0.0, &config), None);
    }

    #[test]
    fn test_poisoned_atr_never_matches() {
        let bar = Bar(100.0, 111.0, 99.0, 110.0);
        let config = ElephantConfig::default();
        assert_eq!(detect(&bar, f64::NAN, &config), None);
        assert_eq!(detect(&bar, f64::INFINITY, &config), None);
        assert_eq!(detect(&bar, -1.0, &config), None);
    }

    #[test]
    fn test_zero_body_rejected() {
        let bar = Bar(100.0, 113.0, 100.0, 100.0);
        let config = ElephantConfig {
            body_percent: Percent::new_const(0.1),
            ..ElephantConfig::default()
        };
        // body is 0% of range, rejected by the percent floor
        assert_eq!(detect(&bar, 5.0, &config), None);
    }
}
