//! ATR volatility reference
//!
//! The classification engine treats volatility as an opaque per-index
//! input: any [`AtrSeries`] works, including a plain `&[f64]` of values
//! computed elsewhere. [`SmaAtr`] is the bundled provider - true range
//! smoothed by a simple moving average, the reference every size threshold
//! is expressed against.

use crate::{Ohlc, Period};

/// Read-only provider of a volatility value per bar index.
///
/// Unavailable values (warmup, out of range) surface as NaN; every
/// size-gated check treats NaN as "no match", so a short or misaligned
/// series degrades to unclassified bars rather than a panic.
pub trait AtrSeries {
    fn value(&self, index: usize) -> f64;
}

impl AtrSeries for [f64] {
    #[inline]
    fn value(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(f64::NAN)
    }
}

impl AtrSeries for Vec<f64> {
    #[inline]
    fn value(&self, index: usize) -> f64 {
        self.as_slice().value(index)
    }
}

impl<A: AtrSeries + ?Sized> AtrSeries for &A {
    #[inline]
    fn value(&self, index: usize) -> f64 {
        (*self).value(index)
    }
}

/// Average True Range with simple-moving-average smoothing.
///
/// True range of bar `i` is `max(high-low, |high-prev_close|,
/// |low-prev_close|)`; the first bar has no previous close and uses
/// `high-low`. The ATR at index `i` is the mean of the last `period` true
/// ranges, NaN while fewer than `period` bars exist.
#[derive(Debug, Clone, Copy)]
pub struct SmaAtr {
    pub period: Period,
}

impl Default for SmaAtr {
    fn default() -> Self {
        Self {
            period: Period::new_const(14),
        }
    }
}

impl SmaAtr {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    /// Compute the full ATR series for `bars`, one value per index.
    pub fn compute_all<T: Ohlc>(&self, bars: &[T]) -> Vec<f64> {
        let period = self.period.get();
        let len = bars.len();
        let mut values = vec![f64::NAN; len];
        if len == 0 {
            return values;
        }

        let mut true_ranges = Vec::with_capacity(len);
        true_ranges.push(bars[0].high() - bars[0].low());
        for i in 1..len {
            let high = bars[i].high();
            let low = bars[i].low();
            let prev_close = bars[i - 1].close();
            let tr = (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs());
            true_ranges.push(tr);
        }

        // Rolling sum over the trailing `period` true ranges
        let mut sum = 0.0;
        for i in 0..len {
            sum += true_ranges[i];
            if i >= period {
                sum -= true_ranges[i - period];
            }
            if i + 1 >= period {
                values[i] = sum / period as f64;
            }
        }

        values
    }
}
