//! # Rolling Extrema
//!
//! Rolling minimum and maximum over a sliding window of `period` data points,
//! computed with a pair of [`PriorityList`]s (one min-ordered peek, one
//! max-ordered peek) and a slot table mapping each position to the cursor
//! value at which its entry leaves the window.
//!
//! ## Parameters
//! - **period**: The window size (number of data points). Defaults to 14.
//!
//! ## Errors
//! - **EmptyData**: rolling_extrema: Input data slice is empty.
//! - **InvalidPeriod**: rolling_extrema: `period` is zero or exceeds the data length.
//! - **NotEnoughValidData**: rolling_extrema: Fewer than `period` data points remain
//!   after the first valid (non-`NaN`) index.
//! - **AllValuesNaN**: rolling_extrema: All input data values are `NaN`.
//!
//! ## Returns
//! - **`Ok(RollingExtremaOutput)`** on success, containing `min` and `max`
//!   `Vec<f64>`s matching the input length, with leading `NaN`s until the
//!   window is filled.
//! - **`Err(RollingExtremaError)`** otherwise.
//!
//! ## Developer Notes / Decision Log
//! - One purge pass per position advance is exact here: a fixed window
//!   matures at most one slot per advance, so the purge cap of six in
//!   `PriorityList::remove_expired` never leaves a backlog.
//! - `NaN` inputs are skipped rather than inserted; a window whose entries
//!   are all `NaN` reads back as `NaN`.
//! - The stream reuses expiry slot ids modulo `period + 1`. A slot is always
//!   drained on the advance its entry matures, one full ring lap before the
//!   id is handed out again.

use crate::utilities::priority_list::PriorityList;
use thiserror::Error;

// --- DATA TYPES ---

#[derive(Debug, Clone)]
pub struct RollingExtremaOutput {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct RollingExtremaParams {
    pub period: Option<usize>,
}

impl Default for RollingExtremaParams {
    fn default() -> Self {
        Self { period: Some(14) }
    }
}

#[derive(Debug, Clone)]
pub struct RollingExtremaInput<'a> {
    pub data: &'a [f64],
    pub params: RollingExtremaParams,
}

impl<'a> RollingExtremaInput<'a> {
    pub fn from_slice(data: &'a [f64], params: RollingExtremaParams) -> Self {
        Self { data, params }
    }

    pub fn with_default_params(data: &'a [f64]) -> Self {
        Self {
            data,
            params: RollingExtremaParams::default(),
        }
    }

    pub fn get_period(&self) -> usize {
        self.params
            .period
            .unwrap_or_else(|| RollingExtremaParams::default().period.unwrap())
    }
}

// --- BUILDER ---

#[derive(Copy, Clone, Debug, Default)]
pub struct RollingExtremaBuilder {
    period: Option<usize>,
}

impl RollingExtremaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, n: usize) -> Self {
        self.period = Some(n);
        self
    }

    pub fn apply_slice(self, data: &[f64]) -> Result<RollingExtremaOutput, RollingExtremaError> {
        let params = RollingExtremaParams {
            period: self.period,
        };
        rolling_extrema(&RollingExtremaInput::from_slice(data, params))
    }

    pub fn into_stream(self) -> Result<RollingExtremaStream, RollingExtremaError> {
        let params = RollingExtremaParams {
            period: self.period,
        };
        RollingExtremaStream::try_new(params)
    }
}

// --- ERRORS ---

#[derive(Debug, Error)]
pub enum RollingExtremaError {
    #[error("rolling_extrema: Empty data provided.")]
    EmptyData,
    #[error("rolling_extrema: Invalid period: period = {period}, data length = {data_len}")]
    InvalidPeriod { period: usize, data_len: usize },
    #[error("rolling_extrema: Not enough valid data: needed = {needed}, valid = {valid}")]
    NotEnoughValidData { needed: usize, valid: usize },
    #[error("rolling_extrema: All values are NaN.")]
    AllValuesNaN,
}

// --- CORE ---

#[inline]
pub fn rolling_extrema(
    input: &RollingExtremaInput,
) -> Result<RollingExtremaOutput, RollingExtremaError> {
    let data = input.data;
    if data.is_empty() {
        return Err(RollingExtremaError::EmptyData);
    }

    let period = input.get_period();
    if period == 0 || period > data.len() {
        return Err(RollingExtremaError::InvalidPeriod {
            period,
            data_len: data.len(),
        });
    }

    let first_valid_idx = match data.iter().position(|v| !v.is_nan()) {
        Some(idx) => idx,
        None => return Err(RollingExtremaError::AllValuesNaN),
    };

    if (data.len() - first_valid_idx) < period {
        return Err(RollingExtremaError::NotEnoughValidData {
            needed: period,
            valid: data.len() - first_valid_idx,
        });
    }

    let n = data.len();
    let mut min_values = vec![f64::NAN; n];
    let mut max_values = vec![f64::NAN; n];

    // slot_table[i] is the cursor position at which the entry inserted at i
    // leaves the window [i - period + 1, i].
    let mut slot_table = vec![0usize; n];
    let mut min_list = PriorityList::new(period, false);
    let mut max_list = PriorityList::new(period, true);

    for i in first_valid_idx..n {
        slot_table[i] = i + period;
        min_list.remove_expired(&slot_table, i);
        max_list.remove_expired(&slot_table, i);

        let v = data[i];
        if !v.is_nan() {
            min_list.insert(v, Some(i));
            max_list.insert(v, Some(i));
        }

        if i >= first_valid_idx + period - 1 {
            min_values[i] = min_list.peek().unwrap_or(f64::NAN);
            max_values[i] = max_list.peek().unwrap_or(f64::NAN);
        }
    }

    Ok(RollingExtremaOutput {
        min: min_values,
        max: max_values,
    })
}

// --- STREAM ---

/// Incremental rolling min/max with O(period) memory.
///
/// Feed one sample per position with [`update`](Self::update); it returns
/// `Some((min, max))` once the window over valid data has filled.
#[derive(Debug, Clone)]
pub struct RollingExtremaStream {
    period: usize,
    idx: usize,
    first_valid: Option<usize>,
    // Expiry slot ring; ids are reused modulo period + 1.
    slots: Vec<usize>,
    min_list: PriorityList,
    max_list: PriorityList,
}

impl RollingExtremaStream {
    pub fn try_new(params: RollingExtremaParams) -> Result<Self, RollingExtremaError> {
        let period = params.period.unwrap_or(14);
        if period == 0 {
            return Err(RollingExtremaError::InvalidPeriod {
                period,
                data_len: 0,
            });
        }
        Ok(Self {
            period,
            idx: 0,
            first_valid: None,
            slots: vec![0; period + 1],
            min_list: PriorityList::new(period, false),
            max_list: PriorityList::new(period, true),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Ingest the sample at the next position. Returns `(min, max)` of the
    /// trailing window once `period` positions have passed since the first
    /// non-`NaN` sample, `None` while warming up.
    pub fn update(&mut self, value: f64) -> Option<(f64, f64)> {
        let i = self.idx;
        let slot = i % self.slots.len();
        self.slots[slot] = i + self.period;

        self.min_list.remove_expired(&self.slots, i);
        self.max_list.remove_expired(&self.slots, i);

        if !value.is_nan() {
            if self.first_valid.is_none() {
                self.first_valid = Some(i);
            }
            self.min_list.insert(value, Some(slot));
            self.max_list.insert(value, Some(slot));
        }

        self.idx += 1;

        match self.first_valid {
            Some(fv) if i >= fv + self.period - 1 => Some((
                self.min_list.peek().unwrap_or(f64::NAN),
                self.max_list.peek().unwrap_or(f64::NAN),
            )),
            _ => None,
        }
    }
}
