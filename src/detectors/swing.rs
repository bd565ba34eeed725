//! Swing point detector
//!
//! Confirms local extrema over a symmetric window: `lookback` bars on each
//! side of the anchor must fail to breach the anchor's extreme. Because the
//! newer half of the window must already be closed, confirmation lags the
//! live edge by `lookback` bars.
//!
//! Naming note: [`is_swing_high`] compares **lows** and [`is_swing_low`]
//! compares **highs**. Hosts draw the SwingHigh marker under a bar whose
//! low held on both sides (support held) and the SwingLow marker over a
//! bar whose high capped on both sides (resistance held). Callers relying
//! on these markers expect exactly this orientation; do not swap the
//! comparisons to the textbook local-extremum definition.

use crate::{BarWindow, Ohlc, Period};

/// Swing point detection parameters
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    pub enabled: bool,
    /// Symmetric window half-width, in bars
    pub lookback: Period,
    /// Bars to wait before publishing a confirmed swing. Reserved; never
    /// consulted by detection.
    pub confirmation_bars: usize,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback: Period::new_const(10),
            confirmation_bars: 1,
        }
    }
}

/// True when no bar within `lookback` positions on either side has a low
/// below the anchor bar's low.
///
/// Requires `lookback` bars on both sides of the anchor; with a truncated
/// window nothing can be confirmed and the result is false.
pub fn is_swing_high<T: Ohlc>(window: &BarWindow<'_, T>, lookback: usize) -> bool {
    if !window.has_older(lookback) || !window.has_newer(lookback) {
        return false;
    }

    let current_low = window.current().low();
    for i in 1..=lookback {
        let (Some(older), Some(newer)) = (window.older(i), window.newer(i)) else {
            return false;
        };
        if older.low() < current_low || newer.low() < current_low {
            return false;
        }
    }
    true
}

/// True when no bar within `lookback` positions on either side has a high
/// above the anchor bar's high.
///
/// Same window requirement as [`is_swing_high`].
pub fn is_swing_low<T: Ohlc>(window: &BarWindow<'_, T>, lookback: usize) -> bool {
    if !window.has_older(lookback) || !window.has_newer(lookback) {
        return false;
    }

    let current_high = window.current().high();
    for i in 1..=lookback {
        let (Some(older), Some(newer)) = (window.older(i), window.newer(i)) else {
            return false;
        };
        if older.high() > current_high || newer.high() > current_high {
            return false;
        }
    }
    true
}
