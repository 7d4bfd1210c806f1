//! Recency-weighted analysis of period history.
//!
//! Each consecutive pair of period starts yields a cycle-length sample and
//! each completed record yields a period-length sample. Samples are weighted
//! by `exp(-0.1 * age)`, where age counts records back from the newest, so
//! the latest transition has weight 1 and older ones fade out gradually
//! instead of being cut off.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::{self, days_between};
use crate::lifestyle::LifestyleProfile;
use crate::models::{PeriodRecord, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};

pub const MIN_CYCLE_LENGTH: i64 = 21;
pub const MAX_CYCLE_LENGTH: i64 = 45;
pub const MIN_PERIOD_LENGTH: i64 = 2;
pub const MAX_PERIOD_LENGTH: i64 = 10;

const RECENCY_DECAY: f64 = 0.1;
const TREND_WINDOW: usize = 4;
const TREND_SLOPE_THRESHOLD: f64 = 0.5;
const DEFAULT_CONFIDENCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    #[default]
    Stable,
    Increasing,
    Decreasing,
}

/// Summary of a user's cycle behaviour. Recomputed on every call, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CyclePattern {
    pub average_cycle_length: u32,
    pub average_period_length: u32,
    /// Weighted standard deviation of cycle length, one decimal place.
    pub cycle_variability: f64,
    pub period_variability: f64,
    /// 0-100, includes the lifestyle bonus.
    pub confidence: f64,
    /// 0-100, the confidence score without lifestyle factors.
    pub data_quality: f64,
    pub trend_direction: TrendDirection,
    /// Share of past predictions that landed within two days, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_accuracy: Option<f64>,
}

impl Default for CyclePattern {
    fn default() -> Self {
        Self {
            average_cycle_length: DEFAULT_CYCLE_LENGTH,
            average_period_length: DEFAULT_PERIOD_LENGTH,
            cycle_variability: 0.0,
            period_variability: 0.0,
            confidence: DEFAULT_CONFIDENCE,
            data_quality: 0.0,
            trend_direction: TrendDirection::Stable,
            prediction_accuracy: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    length: f64,
    weight: f64,
}

/// Analyze `history` against the current local date.
pub fn analyze_pattern(
    history: &[PeriodRecord],
    lifestyle: Option<&LifestyleProfile>,
) -> CyclePattern {
    analyze_pattern_at(history, lifestyle, dates::today())
}

/// Analyze `history` (ascending by start date) with recency measured from
/// `today`. Histories with fewer than two records yield the default pattern.
pub fn analyze_pattern_at(
    history: &[PeriodRecord],
    lifestyle: Option<&LifestyleProfile>,
    today: NaiveDate,
) -> CyclePattern {
    if history.len() < 2 {
        return CyclePattern::default();
    }

    let cycle_samples = cycle_length_samples(history);
    let period_samples = period_length_samples(history);

    let avg_cycle = weighted_mean(&cycle_samples).unwrap_or(DEFAULT_CYCLE_LENGTH as f64);
    let avg_period = weighted_mean(&period_samples).unwrap_or(DEFAULT_PERIOD_LENGTH as f64);
    let cycle_variability = weighted_std_dev(&cycle_samples, avg_cycle);
    let period_variability = weighted_std_dev(&period_samples, avg_period);

    let mut data_quality = quantity_score(cycle_samples.len());
    data_quality += consistency_score(cycle_variability);
    if let Some(last) = history.last() {
        data_quality += recency_score(days_between(last.start_date, today));
    }
    data_quality += completeness_score(history);

    let confidence = data_quality + lifestyle.map_or(0.0, LifestyleProfile::confidence_bonus);

    let lengths: Vec<f64> = cycle_samples.iter().map(|s| s.length).collect();
    let trend_direction = trend_direction(&lengths);

    debug!(
        records = history.len(),
        cycle_samples = cycle_samples.len(),
        period_samples = period_samples.len(),
        avg_cycle,
        cycle_variability,
        ?trend_direction,
        "analyzed cycle pattern"
    );

    CyclePattern {
        average_cycle_length: avg_cycle.round() as u32,
        average_period_length: avg_period.round() as u32,
        cycle_variability: round_tenth(cycle_variability),
        period_variability: round_tenth(period_variability),
        confidence: confidence.clamp(0.0, 100.0),
        data_quality: data_quality.clamp(0.0, 100.0),
        trend_direction,
        prediction_accuracy: None,
    }
}

fn recency_weight(index: usize, total: usize) -> f64 {
    let age = total.saturating_sub(index + 1) as f64;
    (-RECENCY_DECAY * age).exp()
}

fn cycle_length_samples(history: &[PeriodRecord]) -> Vec<Sample> {
    history
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let length = days_between(pair[0].start_date, pair[1].start_date);
            (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH)
                .contains(&length)
                .then(|| Sample {
                    length: length as f64,
                    // the later record of the pair sits at index i + 1
                    weight: recency_weight(i + 1, history.len()),
                })
        })
        .collect()
}

fn period_length_samples(history: &[PeriodRecord]) -> Vec<Sample> {
    history
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let end = record.end_date?;
            let length = days_between(record.start_date, end) + 1;
            (MIN_PERIOD_LENGTH..=MAX_PERIOD_LENGTH)
                .contains(&length)
                .then(|| Sample {
                    length: length as f64,
                    weight: recency_weight(i, history.len()),
                })
        })
        .collect()
}

fn weighted_mean(samples: &[Sample]) -> Option<f64> {
    let total_weight: f64 = samples.iter().map(|s| s.weight).sum();
    if samples.is_empty() || total_weight <= 0.0 {
        return None;
    }
    Some(samples.iter().map(|s| s.length * s.weight).sum::<f64>() / total_weight)
}

/// Weighted population standard deviation; 0 with fewer than two samples.
fn weighted_std_dev(samples: &[Sample], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let total_weight: f64 = samples.iter().map(|s| s.weight).sum();
    let variance = samples
        .iter()
        .map(|s| s.weight * (s.length - mean).powi(2))
        .sum::<f64>()
        / total_weight;
    variance.sqrt()
}

fn quantity_score(valid_cycles: usize) -> f64 {
    match valid_cycles {
        n if n >= 6 => 35.0,
        n if n >= 4 => 25.0,
        n if n >= 2 => 15.0,
        _ => 5.0,
    }
}

fn consistency_score(variability: f64) -> f64 {
    if variability <= 1.5 {
        25.0
    } else if variability <= 3.0 {
        15.0
    } else if variability <= 5.0 {
        8.0
    } else {
        0.0
    }
}

fn recency_score(days_since_last_start: i64) -> f64 {
    if days_since_last_start <= 35 {
        15.0
    } else if days_since_last_start <= 60 {
        8.0
    } else {
        0.0
    }
}

fn completeness_score(history: &[PeriodRecord]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let complete = history.iter().filter(|r| r.end_date.is_some()).count();
    10.0 * complete as f64 / history.len() as f64
}

/// Least-squares slope over the most recent cycle lengths.
fn trend_direction(lengths: &[f64]) -> TrendDirection {
    if lengths.len() < 3 {
        return TrendDirection::Stable;
    }
    let recent = &lengths[lengths.len().saturating_sub(TREND_WINDOW)..];
    let n = recent.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx): (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in recent.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);

    if slope > TREND_SLOPE_THRESHOLD {
        TrendDirection::Increasing
    } else if slope < -TREND_SLOPE_THRESHOLD {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
