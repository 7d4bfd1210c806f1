use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::{self, add_days, days_between};
use crate::lifestyle::LifestyleProfile;
use crate::models::{CycleStats, PeriodRecord, DEFAULT_CYCLE_LENGTH};
use crate::pattern::{
    analyze_pattern_at, CyclePattern, TrendDirection, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH,
};

const MIN_RANGE_DAYS: f64 = 2.0;
const MAX_TREND_ADJUSTMENT: f64 = 1.5;
const TREND_ADJUSTMENT_FACTOR: f64 = 0.3;
/// A prediction within this many days of the actual start counts as a hit.
const ACCURACY_TOLERANCE_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 75.0 {
            ConfidenceLevel::High
        } else if confidence >= 50.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptivePrediction {
    pub next_period_date: NaiveDate,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub cycle_length_prediction: u32,
    pub period_length_prediction: u32,
    pub prediction_range: PredictionRange,
    pub pattern: CyclePattern,
}

/// Predict the next period start from `last_period_start`, measuring data
/// recency against the current local date.
pub fn predict(
    last_period_start: NaiveDate,
    history: &[PeriodRecord],
    lifestyle: Option<&LifestyleProfile>,
) -> AdaptivePrediction {
    predict_at(last_period_start, history, lifestyle, dates::today())
}

/// Pure form of [`predict`] with an explicit reference date.
///
/// Lifestyle adjustments are applied to the pattern's average first, then
/// the trend adjustment. The adjusted length is held within 21-45 days so
/// the prediction always sits inside its range.
pub fn predict_at(
    last_period_start: NaiveDate,
    history: &[PeriodRecord],
    lifestyle: Option<&LifestyleProfile>,
    today: NaiveDate,
) -> AdaptivePrediction {
    let pattern = analyze_pattern_at(history, lifestyle, today);

    let mut adjusted = pattern.average_cycle_length as f64;
    if let Some(profile) = lifestyle {
        adjusted += profile.cycle_length_adjustment();
    }

    let trend_adjustment =
        (pattern.cycle_variability * TREND_ADJUSTMENT_FACTOR).min(MAX_TREND_ADJUSTMENT);
    match pattern.trend_direction {
        TrendDirection::Increasing => adjusted += trend_adjustment,
        TrendDirection::Decreasing => adjusted -= trend_adjustment,
        TrendDirection::Stable => {}
    }
    let adjusted = adjusted.clamp(MIN_CYCLE_LENGTH as f64, MAX_CYCLE_LENGTH as f64);

    let range_size = pattern.cycle_variability.max(MIN_RANGE_DAYS);
    let earliest_length = (adjusted - range_size).max(MIN_CYCLE_LENGTH as f64);
    let latest_length = (adjusted + range_size).min(MAX_CYCLE_LENGTH as f64);

    let next_period_date = add_days(last_period_start, adjusted.round() as i64);
    let prediction_range = PredictionRange {
        earliest: add_days(last_period_start, earliest_length.round() as i64),
        latest: add_days(last_period_start, latest_length.round() as i64),
    };

    debug!(
        %last_period_start,
        adjusted_cycle_length = adjusted,
        %next_period_date,
        confidence = pattern.confidence,
        "generated adaptive prediction"
    );

    AdaptivePrediction {
        next_period_date,
        confidence: pattern.confidence,
        confidence_level: ConfidenceLevel::from_confidence(pattern.confidence),
        cycle_length_prediction: adjusted.round() as u32,
        period_length_prediction: pattern.average_period_length,
        prediction_range,
        pattern,
    }
}

/// Plain average of the plausible (21-45 day) gaps between period starts,
/// used as the non-adaptive baseline.
pub fn cycle_length_from_history(history: &[PeriodRecord]) -> u32 {
    if history.len() < 2 {
        return DEFAULT_CYCLE_LENGTH;
    }

    let mut starts: Vec<NaiveDate> = history.iter().map(|r| r.start_date).collect();
    starts.sort();

    let lengths: Vec<i64> = starts
        .windows(2)
        .map(|w| days_between(w[0], w[1]))
        .filter(|days| (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(days))
        .collect();

    if lengths.is_empty() {
        return DEFAULT_CYCLE_LENGTH;
    }
    (lengths.iter().sum::<i64>() as f64 / lengths.len() as f64).round() as u32
}

/// A past prediction and, once logged, the period start that followed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub predicted: NaiveDate,
    pub actual: Option<NaiveDate>,
}

/// Percentage of predictions that landed within two days of the actual
/// start. Predictions still waiting for an actual date count as misses.
pub fn prediction_accuracy(outcomes: &[PredictionOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let hits = outcomes
        .iter()
        .filter(|o| {
            o.actual
                .is_some_and(|actual| days_between(o.predicted, actual).abs() <= ACCURACY_TOLERANCE_DAYS)
        })
        .count();
    hits as f64 / outcomes.len() as f64 * 100.0
}

/// Compute cycle statistics for the stats view.
pub fn cycle_stats(history: &[PeriodRecord]) -> CycleStats {
    let Some(last) = history.last() else {
        return CycleStats {
            total_periods: 0,
            avg_cycle_length: None,
            avg_period_length: None,
            shortest_cycle: None,
            longest_cycle: None,
            last_period_start: None,
            last_period_end: None,
        };
    };

    let period_lengths: Vec<f64> = history
        .iter()
        .filter_map(|r| r.end_date.map(|end| days_between(r.start_date, end) as f64 + 1.0))
        .collect();

    let cycle_lengths: Vec<i64> = history
        .windows(2)
        .map(|w| days_between(w[0].start_date, w[1].start_date))
        .collect();

    CycleStats {
        total_periods: history.len(),
        avg_cycle_length: if cycle_lengths.is_empty() {
            None
        } else {
            Some(cycle_lengths.iter().sum::<i64>() as f32 / cycle_lengths.len() as f32)
        },
        avg_period_length: if period_lengths.is_empty() {
            None
        } else {
            Some(period_lengths.iter().sum::<f64>() as f32 / period_lengths.len() as f32)
        },
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: Some(last.start_date),
        last_period_end: last.end_date,
    }
}
