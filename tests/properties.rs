//! Property-based tests for the classification cascade.

use proptest::prelude::*;
use triggerbar::detectors::{self, elephant, engulfing, tail};
use triggerbar::prelude::*;

#[derive(Debug, Clone, Copy)]
struct TestBar {
    o: f64,
    h: f64,
    l: f64,
    c: f64,
}

impl Ohlc for TestBar {
    fn open(&self) -> f64 {
        self.o
    }

    fn high(&self) -> f64 {
        self.h
    }

    fn low(&self) -> f64 {
        self.l
    }

    fn close(&self) -> f64 {
        self.c
    }
}

/// Arbitrary well-formed bar: high/low bracket open/close
fn arb_bar() -> impl Strategy<Value = TestBar> {
    (1.0..1000.0f64, 1.0..1000.0f64, 0.0..50.0f64, 0.0..50.0f64).prop_map(
        |(open, close, up_wick, down_wick)| TestBar {
            o: open,
            h: open.max(close) + up_wick,
            l: (open.min(close) - down_wick).max(0.0),
            c: close,
        },
    )
}

fn all_disabled() -> DetectionConfig {
    let mut config = DetectionConfig::default();
    config.elephant.enabled = false;
    config.tail.enabled = false;
    config.engulfing.enabled = false;
    config.swing.enabled = false;
    config
}

proptest! {
    /// Zero-range bars never match the ratio-based families, no matter
    /// how permissive the thresholds are.
    #[test]
    fn zero_range_never_elephant_or_tail(
        price in 1.0..1000.0f64,
        atr in 0.0..10.0f64,
    ) {
        let doji = TestBar { o: price, h: price, l: price, c: price };

        let elephant_config = ElephantConfig {
            min_size: 0.1,
            body_percent: Percent::new(0.1).unwrap(),
            ..ElephantConfig::default()
        };
        prop_assert_eq!(elephant::detect(&doji, atr, &elephant_config), None);

        let tail_config = TailConfig {
            min_size: 0.1,
            min_percent: Percent::new(0.1).unwrap(),
            ..TailConfig::default()
        };
        prop_assert_eq!(tail::detect(&doji, atr, &tail_config), None);
    }

    /// Raising the body-percent threshold can only remove elephant
    /// matches, never add them.
    #[test]
    fn elephant_monotonic_in_body_percent(
        bar in arb_bar(),
        atr in 0.0..50.0f64,
        low_threshold in 0.1..100.0f64,
        delta in 0.0..50.0f64,
    ) {
        let high_threshold = (low_threshold + delta).min(100.0);

        let loose = ElephantConfig {
            body_percent: Percent::new(low_threshold).unwrap(),
            ..ElephantConfig::default()
        };
        let strict = ElephantConfig {
            body_percent: Percent::new(high_threshold).unwrap(),
            ..ElephantConfig::default()
        };

        if elephant::detect(&bar, atr, &strict).is_some() {
            prop_assert!(elephant::detect(&bar, atr, &loose).is_some());
        }
    }

    /// An engulfing match always agrees with the bar's own direction, so
    /// the bullish and bearish arms are mutually exclusive.
    #[test]
    fn engulfing_direction_matches_bar(
        bar in arb_bar(),
        prev in arb_bar(),
        atr in 0.0..50.0f64,
        engulf_wick in any::<bool>(),
    ) {
        let config = EngulfingConfig {
            engulf_wick,
            ..EngulfingConfig::default()
        };
        match engulfing::detect(&bar, &prev, atr, &config) {
            Some(BarType::BullishEngulfing) => prop_assert!(bar.is_bullish()),
            Some(BarType::BearishEngulfing) => prop_assert!(bar.is_bearish()),
            Some(other) => prop_assert!(false, "unexpected type {:?}", other),
            None => {}
        }
    }

    /// Classification is a pure function: same window, same result.
    #[test]
    fn classify_is_deterministic(
        bars in proptest::collection::vec(arb_bar(), 3..10),
        atr in 0.0..50.0f64,
    ) {
        let config = DetectionConfig::default();
        let window = BarWindow::new(&bars, bars.len() - 1).unwrap();
        let first = detectors::classify(&window, atr, &config);
        let second = detectors::classify(&window, atr, &config);
        prop_assert_eq!(first, second);
    }

    /// With every family disabled the cascade always falls through.
    #[test]
    fn all_disabled_yields_common(
        bars in proptest::collection::vec(arb_bar(), 2..10),
        atr in 0.0..50.0f64,
    ) {
        let config = all_disabled();
        let window = BarWindow::new(&bars, bars.len() - 1).unwrap();
        prop_assert_eq!(detectors::classify(&window, atr, &config), BarType::CommonBar);
    }

    /// A bar whose low holds on both sides of the window is a SwingHigh,
    /// no matter which pattern families also match.
    #[test]
    fn swing_high_overrides_everything(
        mut bars in proptest::collection::vec(arb_bar(), 5),
        atr in 0.0..50.0f64,
    ) {
        // force the anchor's low under every neighbor
        let min_low = bars.iter().map(|b| b.l).fold(f64::INFINITY, f64::min);
        bars[2].l = min_low - 1.0;

        let mut config = DetectionConfig::default();
        config.swing.lookback = Period::new(2).unwrap();

        let window = BarWindow::new(&bars, 2).unwrap();
        prop_assert_eq!(detectors::classify(&window, atr, &config), BarType::SwingHigh);
    }
}
