//! # triggerbar - Trigger Bar Detection
//!
//! Classifies OHLC price bars into trigger-bar patterns for chart annotation:
//! momentum ("elephant") bars, rejection ("tail") bars, engulfing bars, and
//! confirmed swing points. Each evaluated bar receives exactly one [`BarType`];
//! bars matching nothing classify as [`BarType::CommonBar`].
//!
//! ## Quick Start
//!
//! ```rust
//! use triggerbar::prelude::*;
//!
//! // Define your OHLC data
//! struct Bar { o: f64, h: f64, l: f64, c: f64 }
//!
//! impl Ohlc for Bar {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//! }
//!
//! // Build an engine with the default detection settings
//! let engine = EngineBuilder::new().build().unwrap();
//!
//! // Supply bars and a volatility reference, then scan
//! let bars: Vec<Bar> = vec![];
//! let atr = SmaAtr::default().compute_all(&bars);
//! let marks = engine.scan(&bars, &atr[..]).unwrap();
//! assert!(marks.is_empty());
//! ```

pub mod atr;
pub mod detectors;
pub mod params;

pub mod prelude {
    pub use crate::{
        // ATR provider
        atr::{AtrSeries, SmaAtr},
        // Detector configs + cascade
        detectors::*,
        // Parameter surface
        params::{get_flag, get_percent, get_period, ParamMeta, ParamType},
        // Parallel
        scan_parallel,
        // Engine
        BarMark,
        // Types
        BarType,
        BarWindow,
        DetectionConfig,
        Direction,
        EngineBuilder,
        MarkIterator,
        // Core traits
        Ohlc,
        OhlcExt,
        // Errors
        PatternError,
        Percent,
        Period,
        Result,
        ScanError,
        ScanResult,
        TriggerEngine,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur during bar classification
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid OHLC at index {index}: {reason}")]
    InvalidOhlc { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Percentage value in range 0.0..=100.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    /// Create a new Percent, validating the value is in [0.0, 100.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Percent cannot be NaN or infinite",
            ));
        }
        if !(0.0..=100.0).contains(&value) {
            return Err(PatternError::OutOfRange {
                field: "Percent",
                value,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Percent from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Percent {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Percent {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Percent::new(value).map_err(serde::de::Error::custom)
    }
}

/// Bar-count period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core OHLC data trait
pub trait Ohlc {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLC data
pub trait OhlcExt: Ohlc {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    /// Wick above the body: `high - max(open, close)`
    #[inline]
    fn upper_tail(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    /// Wick below the body: `min(open, close) - low`
    #[inline]
    fn lower_tail(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Body as a percentage of range. Returns None if range is zero.
    #[inline]
    fn body_percent(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| self.body() / range * 100.0)
    }

    /// Dominant tail as a percentage of range. Returns None if range is zero.
    #[inline]
    fn tail_percent(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| self.lower_tail().max(self.upper_tail()) / range * 100.0)
    }

    /// Validate OHLC data consistency
    fn validate(&self) -> Result<()> {
        if self.high() < self.low() {
            return Err(PatternError::InvalidOhlc {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
        {
            return Err(PatternError::InvalidOhlc {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
        {
            return Err(PatternError::InvalidOhlc {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        Ok(())
    }
}

impl<T: Ohlc> OhlcExt for T {}

// ============================================================
// BAR TYPE - classification result (Copy, no allocations)
// ============================================================

/// Direction/bias of a classified bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

/// Classification assigned to a bar. Exactly one per evaluated bar;
/// [`BarType::CommonBar`] is the no-match default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum BarType {
    /// Large-range momentum bar closing down
    BearishElephant,
    /// Large-range momentum bar closing up
    BullishElephant,
    /// Down bar whose body (and optionally wick) contains the previous up bar
    BearishEngulfing,
    /// Up bar whose body (and optionally wick) contains the previous down bar
    BullishEngulfing,
    /// Rejection bar dominated by its upper wick
    BearishTail,
    /// Rejection bar dominated by its lower wick
    BullishTail,
    /// Bar whose low held on both sides of a symmetric window
    SwingHigh,
    /// Bar whose high capped on both sides of a symmetric window
    SwingLow,
    /// No pattern matched
    #[default]
    CommonBar,
}

impl BarType {
    /// Stable string identifier, suitable for marker/series names
    pub fn as_str(&self) -> &'static str {
        match self {
            BarType::BearishElephant => "BearishElephant",
            BarType::BullishElephant => "BullishElephant",
            BarType::BearishEngulfing => "BearishEngulfing",
            BarType::BullishEngulfing => "BullishEngulfing",
            BarType::BearishTail => "BearishTail",
            BarType::BullishTail => "BullishTail",
            BarType::SwingHigh => "SwingHigh",
            BarType::SwingLow => "SwingLow",
            BarType::CommonBar => "CommonBar",
        }
    }

    /// Rendering bias for this classification.
    ///
    /// Hosts draw bullish marks under the bar (up arrow) and bearish marks
    /// above it (down arrow). `SwingHigh` marks a low that held (support),
    /// `SwingLow` marks a high that capped (resistance).
    pub fn direction(&self) -> Direction {
        match self {
            BarType::BullishElephant
            | BarType::BullishEngulfing
            | BarType::BullishTail
            | BarType::SwingHigh => Direction::Bullish,
            BarType::BearishElephant
            | BarType::BearishEngulfing
            | BarType::BearishTail
            | BarType::SwingLow => Direction::Bearish,
            BarType::CommonBar => Direction::Neutral,
        }
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.direction().is_bullish()
    }

    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.direction().is_bearish()
    }

    #[inline]
    pub fn is_swing(&self) -> bool {
        matches!(self, BarType::SwingHigh | BarType::SwingLow)
    }

    #[inline]
    pub fn is_common(&self) -> bool {
        matches!(self, BarType::CommonBar)
    }
}

/// Classification of a single bar index - the per-bar output of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BarMark {
    pub index: usize,
    pub bar_type: BarType,
}

// ============================================================
// BAR WINDOW
// ============================================================

/// Read-only view over an append-only bar slice, anchored at an
/// evaluation index.
///
/// `older(n)` walks toward the start of history, `newer(n)` toward the
/// live edge. Newer bars exist only because swing confirmation lags the
/// live edge by the swing lookback; pattern checks use the current and
/// older bars exclusively.
#[derive(Debug, Clone, Copy)]
pub struct BarWindow<'a, T: Ohlc> {
    bars: &'a [T],
    index: usize,
}

impl<'a, T: Ohlc> BarWindow<'a, T> {
    /// Anchor a window at `index`. Returns None if `index` is out of range.
    pub fn new(bars: &'a [T], index: usize) -> Option<Self> {
        (index < bars.len()).then_some(Self { bars, index })
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn current(&self) -> &T {
        &self.bars[self.index]
    }

    /// Bar `n` positions older than the current bar
    #[inline]
    pub fn older(&self, n: usize) -> Option<&T> {
        self.index.checked_sub(n).map(|i| &self.bars[i])
    }

    /// Bar `n` positions newer than the current bar
    #[inline]
    pub fn newer(&self, n: usize) -> Option<&T> {
        self.bars.get(self.index + n)
    }

    #[inline]
    pub fn has_older(&self, n: usize) -> bool {
        self.index >= n
    }

    #[inline]
    pub fn has_newer(&self, n: usize) -> bool {
        self.index + n < self.bars.len()
    }
}

// ============================================================
// DETECTION CONFIG
// ============================================================

use detectors::{ElephantConfig, EngulfingConfig, SwingConfig, TailConfig};

/// Immutable parameter bundle for all detection families.
///
/// Each family carries its own `enabled` flag; disabling a family removes
/// its contribution to the classification cascade. The ATR period is
/// passed through for warmup gating - the engine never computes ATR
/// itself (see [`crate::atr`] for the bundled provider).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub atr_period: Period,
    pub elephant: ElephantConfig,
    pub tail: TailConfig,
    pub engulfing: EngulfingConfig,
    pub swing: SwingConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            atr_period: Period::new_const(14),
            elephant: ElephantConfig::default(),
            tail: TailConfig::default(),
            engulfing: EngulfingConfig::default(),
            swing: SwingConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Validate every field against its documented range
    pub fn validate(&self) -> Result<()> {
        check_range("atr_period", self.atr_period.get() as f64, 2.0, 100.0)?;
        check_range("elephant.min_size", self.elephant.min_size, 0.1, 5.0)?;
        check_range(
            "elephant.body_percent",
            self.elephant.body_percent.get(),
            0.1,
            100.0,
        )?;
        check_range("tail.min_size", self.tail.min_size, 0.1, 10.0)?;
        check_range("tail.min_percent", self.tail.min_percent.get(), 0.1, 100.0)?;
        check_range("engulfing.min_size", self.engulfing.min_size, 0.0, 10.0)?;
        check_range(
            "engulfing.float_allowance",
            self.engulfing.float_allowance,
            0.0,
            10.0,
        )?;
        check_range(
            "swing.lookback",
            self.swing.lookback.get() as f64,
            1.0,
            100.0,
        )?;
        check_range(
            "swing.confirmation_bars",
            self.swing.confirmation_bars as f64,
            1.0,
            10.0,
        )?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value.is_infinite() {
        return Err(PatternError::InvalidValue(field));
    }
    if value < min || value > max {
        return Err(PatternError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ============================================================
// TRIGGER ENGINE
// ============================================================

use crate::atr::AtrSeries;

/// Engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub validate_data: bool,
}

/// Batch classification driver.
///
/// Owns nothing but configuration: the caller supplies bar history and a
/// precomputed ATR series on every call. Every evaluation is a pure
/// function of a read-only window, so an engine can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct TriggerEngine {
    detection: DetectionConfig,
    config: EngineConfig,
}

impl TriggerEngine {
    pub fn new(detection: DetectionConfig) -> Self {
        Self {
            detection,
            config: EngineConfig::default(),
        }
    }

    #[inline]
    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    /// First evaluable index.
    ///
    /// Both the ATR period and the swing lookback gate evaluation, whether
    /// or not swing detection is enabled.
    #[inline]
    pub fn warmup(&self) -> usize {
        self.detection
            .atr_period
            .get()
            .max(self.detection.swing.lookback.get())
    }

    // ===========================================
    // MID-LEVEL: Single-bar / Range
    // ===========================================

    /// Classify the bar at `index`.
    ///
    /// Returns None when `index` is still inside the warmup window or out
    /// of range - a skipped evaluation, not a `CommonBar` result. Swing
    /// confirmation additionally requires `swing.lookback` newer bars; at
    /// the live edge the override is skipped and the cascade result stands.
    pub fn classify_at<T, A>(&self, bars: &[T], atr: &A, index: usize) -> Option<BarType>
    where
        T: Ohlc,
        A: AtrSeries + ?Sized,
    {
        if index < self.warmup() {
            return None;
        }
        let window = BarWindow::new(bars, index)?;
        Some(detectors::classify(
            &window,
            atr.value(index),
            &self.detection,
        ))
    }

    /// Classify a range of bar indices. Indices inside the warmup window
    /// are skipped.
    pub fn scan_range<T, A>(
        &self,
        bars: &[T],
        atr: &A,
        range: std::ops::Range<usize>,
    ) -> Vec<BarMark>
    where
        T: Ohlc,
        A: AtrSeries + ?Sized,
    {
        range
            .filter_map(|index| {
                self.classify_at(bars, atr, index)
                    .map(|bar_type| BarMark { index, bar_type })
            })
            .collect()
    }

    // ===========================================
    // HIGH-LEVEL: Batch processing
    // ===========================================

    /// Classify every evaluable bar, one [`BarMark`] per index from
    /// `warmup()` to the end of history. `CommonBar` results are included:
    /// hosts use them to clear stale markers.
    pub fn scan<T, A>(&self, bars: &[T], atr: &A) -> Result<Vec<BarMark>>
    where
        T: Ohlc,
        A: AtrSeries + ?Sized,
    {
        if self.config.validate_data {
            self.validate_bars(bars)?;
        }

        Ok(self.scan_range(bars, atr, self.warmup()..bars.len()))
    }

    /// Create an iterator over evaluable bars with their classifications.
    pub fn iter<'a, T, A>(&'a self, bars: &'a [T], atr: &'a A) -> MarkIterator<'a, T, A>
    where
        T: Ohlc,
        A: AtrSeries + ?Sized,
    {
        MarkIterator::new(self, bars, atr)
    }

    // ===========================================
    // Internal helpers
    // ===========================================

    fn validate_bars<T: Ohlc>(&self, bars: &[T]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| match e {
                PatternError::InvalidOhlc { reason, .. } => {
                    PatternError::InvalidOhlc { index: i, reason }
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

// ============================================================
// MARK ITERATOR
// ============================================================

/// Iterator over evaluable bars and their classifications
pub struct MarkIterator<'a, T: Ohlc, A: AtrSeries + ?Sized> {
    engine: &'a TriggerEngine,
    bars: &'a [T],
    atr: &'a A,
    current: usize,
}

impl<'a, T: Ohlc, A: AtrSeries + ?Sized> MarkIterator<'a, T, A> {
    fn new(engine: &'a TriggerEngine, bars: &'a [T], atr: &'a A) -> Self {
        Self {
            engine,
            bars,
            atr,
            current: engine.warmup(),
        }
    }
}

impl<'a, T: Ohlc, A: AtrSeries + ?Sized> Iterator for MarkIterator<'a, T, A> {
    type Item = BarMark;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current;
        let bar_type = self.engine.classify_at(self.bars, self.atr, index)?;
        self.current += 1;
        Some(BarMark { index, bar_type })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bars.len().saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl<'a, T: Ohlc, A: AtrSeries + ?Sized> ExactSizeIterator for MarkIterator<'a, T, A> {}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating [`TriggerEngine`] instances
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    detection: DetectionConfig,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole detection config
    pub fn detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    pub fn atr_period(mut self, period: Period) -> Self {
        self.detection.atr_period = period;
        self
    }

    pub fn elephant(mut self, elephant: ElephantConfig) -> Self {
        self.detection.elephant = elephant;
        self
    }

    pub fn tail(mut self, tail: TailConfig) -> Self {
        self.detection.tail = tail;
        self
    }

    pub fn engulfing(mut self, engulfing: EngulfingConfig) -> Self {
        self.detection.engulfing = engulfing;
        self
    }

    pub fn swing(mut self, swing: SwingConfig) -> Self {
        self.detection.swing = swing;
        self
    }

    /// Enable/disable OHLC validation before scans
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Build the engine, validating the detection config
    pub fn build(self) -> Result<TriggerEngine> {
        self.detection.validate()?;
        Ok(TriggerEngine {
            detection: self.detection,
            config: self.config,
        })
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub marks: Vec<BarMark>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Parallel scanning of multiple instruments.
///
/// Classification is a pure function of a read-only window, so instruments
/// fan out across threads with no synchronization.
pub fn scan_parallel<'a, T, I>(
    engine: &TriggerEngine,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    T: Ohlc + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T], &'a [f64])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars, atr)| {
            engine
                .scan(bars, atr)
                .map(|marks| ScanResult {
                    symbol: symbol.to_string(),
                    marks,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
