//! Tail bar detector
//!
//! A tail bar is a rejection candle: one wick dominates the range. A long
//! lower tail means lows were rejected (bullish); a long upper tail means
//! highs were rejected (bearish). Ties resolve bearish.

use super::clears_atr_floor;
use crate::{BarType, Ohlc, OhlcExt, Percent};

/// Tail bar detection parameters
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TailConfig {
    pub enabled: bool,
    /// Minimum candle range as an ATR multiple
    pub min_size: f64,
    /// Minimum dominant-tail size as a percentage of range
    pub min_percent: Percent,
    /// Marker coloring hint for hosts; never consulted by detection
    pub color_matters: bool,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_size: 1.0,
            min_percent: Percent::new_const(75.0),
            color_matters: false,
        }
    }
}

/// Detect a tail bar.
///
/// Zero-range bars have no defined tail ratio and never match.
pub fn detect<T: Ohlc>(bar: &T, atr: f64, config: &TailConfig) -> Option<BarType> {
    if !clears_atr_floor(bar.range(), config.min_size, atr) {
        return None;
    }

    let tail_percent = bar.tail_percent()?;
    if tail_percent < config.min_percent.get() {
        return None;
    }

    Some(if bar.lower_tail() > bar.upper_tail() {
        BarType::BullishTail
    } else {
        BarType::BearishTail
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
    fn test_long_lower_tail_is_bullish() {
        // lower tail 20, upper tail 1, range 26: ratio 76.9% >= 75%
        let bar = Bar(105.0, 106.0, 80.0, 100.0);
        let config = TailConfig::default();
        assert_eq!(detect(&bar, 10.0, &config), Some(BarType::BullishTail));
    }

    #[test]
    fn test_long_upper_tail_is_bearish() {
        let bar = Bar(100.0, 126.0, 99.0, 105.0);
        let config = TailConfig::default();
        assert_eq!(detect(&bar, 10.0, &config), Some(BarType::BearishTail));
    }

    #[test]
    fn test_equal_tails_resolve_bearish() {
        // both tails 4, range 12: ratio 33.3%, needs a lower floor to match
        let bar = Bar(98.0, 106.0, 94.0, 102.0);
        let config = TailConfig {
            min_percent: Percent::new_const(30.0),
            ..TailConfig::default()
        };
        assert_eq!(detect(&bar, 1.0, &config), Some(BarType::BearishTail));
    }

    #[test]
    fn test_small_range_rejected() {
        let bar = Bar(105.0, 106.0, 80.0, 100.0);
        let config = TailConfig::default();
        // range 26 < 1.0 * 30
        assert_eq!(detect(&bar, 30.0, &config), None);
    }

    #[test]
    fn test_short_tail_rejected() {
        // dominant tail 11/20 = 55% < 75%
        let bar = Bar(101.0, 110.0, 90.0, 105.0);
        let config = TailConfig::default();
        assert_eq!(detect(&bar, 5.0, &config), None);
    }

    #[test]
    fn test_zero_range_never_matches() {
        let bar = Bar(100.0, 100.0, 100.0, 100.0);
        let config = TailConfig {
            min_size: 0.1,
            min_percent: Percent::new_const(0.1),
            ..TailConfig::default()
        };
        assert_eq!(detect(&bar, 0.0, &config), None);
    }

    #[test]
    fn test_poisoned_atr_never_matches() {
        let bar = Bar(105.0, 106.0, 80.0, 100.0);
        let config = TailConfig::default();
        assert_eq!(detect(&bar, f64::NAN, &config), None);
        assert_eq!(detect(&bar, -0.5, &config), None);
    }
}
