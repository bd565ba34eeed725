//! Trigger-bar detectors
//!
//! One module per detection family, plus the priority cascade that merges
//! them into a single [`BarType`](crate::BarType) per bar.
//!
//! # Families
//!
//! - **Elephant**: large-range momentum bars with a dominant body
//! - **Tail**: rejection bars with a dominant wick
//! - **Engulfing**: bars containing the previous bar's body (or wick)
//! - **Swing**: local extrema confirmed over a symmetric window

pub mod elephant;
pub mod engulfing;
pub mod swing;
pub mod tail;

pub use elephant::ElephantConfig;
pub use engulfing::EngulfingConfig;
pub use swing::SwingConfig;
pub use tail::TailConfig;

use crate::{BarType, BarWindow, DetectionConfig, Ohlc};

/// Classify one bar by running every enabled family in fixed order.
///
/// This is a priority cascade, not a set of independent flags: a later
/// family that matches overwrites an earlier match, and a confirmed swing
/// point overwrites everything. Order: elephant, tail, engulfing, swing.
///
/// `atr` is the volatility reference for the window's anchor index. A
/// non-finite or negative value disables every size-gated check, so no
/// elephant/tail/engulfing match can come out of a poisoned ATR.
///
/// The swing override runs only when the window holds `lookback` bars on
/// both sides of the anchor; near the live edge, confirmation is simply
/// not yet possible and the cascade result stands.
pub fn classify<T: Ohlc>(window: &BarWindow<'_, T>, atr: f64, config: &DetectionConfig) -> BarType {
    let bar = window.current();
    let mut bar_type = BarType::CommonBar;

    if config.elephant.enabled {
        if let Some(t) = elephant::detect(bar, atr, &config.elephant) {
            bar_type = t;
        }
    }

    if config.tail.enabled {
        if let Some(t) = tail::detect(bar, atr, &config.tail) {
            bar_type = t;
        }
    }

    if config.engulfing.enabled {
        if let Some(prev) = window.older(1) {
            if let Some(t) = engulfing::detect(bar, prev, atr, &config.engulfing) {
                bar_type = t;
            }
        }
    }

    if config.swing.enabled {
        let lookback = config.swing.lookback.get();
        if window.has_older(lookback) && window.has_newer(lookback) {
            // Swing-high is checked first; a bar can never be both.
            if swing::is_swing_high(window, lookback) {
                bar_type = BarType::SwingHigh;
            } else if swing::is_swing_low(window, lookback) {
                bar_type = BarType::SwingLow;
            }
        }
    }

    bar_type
}

/// True when `range` clears the family's ATR-multiple floor.
///
/// NaN, infinite, or negative ATR values fail the gate outright, which
/// keeps a poisoned volatility input from ever producing a match.
#[inline]
pub(crate) fn clears_atr_floor(range: f64, min_size: f64, atr: f64) -> bool {
    atr.is_finite() && atr >= 0.0 && range >= min_size * atr
}
