//! Engulfing bar detector
//!
//! An engulfing bar reverses against the previous bar and contains it
//! entirely. Two containment policies exist: body-only (the current body
//! straddles the previous body) and wick-inclusive (the current body
//! straddles the previous bar's full range).

use super::clears_atr_floor;
use crate::{BarType, Ohlc, OhlcExt};

/// Engulfing bar detection parameters
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngulfingConfig {
    pub enabled: bool,
    /// Gap tolerance on the open comparison, in ticks. Reserved; never
    /// consulted by detection.
    pub float_allowance: f64,
    /// Minimum candle range as an ATR multiple
    pub min_size: f64,
    /// Require the previous bar's wicks to be engulfed as well
    pub engulf_wick: bool,
}

impl Default for EngulfingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            float_allowance: 0.0,
            min_size: 1.0,
            engulf_wick: false,
        }
    }
}

/// Detect an engulfing bar against its predecessor.
///
/// All comparisons are strict: a current bar merely touching the previous
/// open or close does not engulf it. The bullish and bearish arms are
/// mutually exclusive since they require opposite bar directions.
pub fn detect<T: Ohlc>(bar: &T, prev: &T, atr: f64, config: &EngulfingConfig) -> Option<BarType> {
    if !clears_atr_floor(bar.range(), config.min_size, atr) {
        return None;
    }

    let (open, close) = (bar.open(), bar.close());
    let (prev_open, prev_close) = (prev.open(), prev.close());

    if config.engulf_wick {
        if bar.is_bullish() && prev.is_bearish() && open < prev.low() && close > prev.high() {
            return Some(BarType::BullishEngulfing);
        }
        if bar.is_bearish() && prev.is_bullish() && open > prev.high() && close < prev.low() {
            return Some(BarType::BearishEngulfing);
        }
    } else {
        if bar.is_bullish() && prev.is_bearish() && open < prev_close && close > prev_open {
            return Some(BarType::BullishEngulfing);
        }
        if bar.is_bearish() && prev.is_bullish() && open > prev_close && close < prev_open {
            return Some(BarType::BearishEngulfing);
        }
    }

    None
}
