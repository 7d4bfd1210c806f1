//! Human-readable guidance derived from a cycle pattern, the stored cycle
//! and symptom logs. Pure templating over already computed values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dates::days_between;
use crate::lifestyle::{
    ExerciseFrequency, HealthCondition, LifestyleProfile, SleepQuality, StressLevel, WorkSchedule,
};
use crate::models::{CycleData, PeriodRecord, SymptomCategory, SymptomLog};
use crate::pattern::{CyclePattern, TrendDirection};

const TYPICAL_MIN_CYCLE: i64 = 21;
const TYPICAL_MAX_CYCLE: i64 = 35;
const MIN_SYMPTOM_LOGS: usize = 5;

pub fn personalized_insights(
    pattern: &CyclePattern,
    lifestyle: Option<&LifestyleProfile>,
) -> Vec<String> {
    let mut insights = Vec::new();
    let mut push = |s: &str| insights.push(s.to_string());

    if pattern.confidence < 40.0 {
        push("Keep logging periods consistently for more accurate predictions!");
    } else if pattern.confidence >= 75.0 {
        push("Great data quality! Your predictions are highly reliable.");
    }

    if pattern.cycle_variability <= 2.0 {
        push("Your cycles are very regular - excellent for planning ahead!");
    } else if pattern.cycle_variability > 6.0 {
        push("Your cycles show variation. Consider tracking stress, sleep, and exercise patterns.");
    }

    match pattern.trend_direction {
        TrendDirection::Increasing => push(
            "Your cycle length has been gradually increasing. This is often normal but worth monitoring.",
        ),
        TrendDirection::Decreasing => push(
            "Your cycle length has been gradually decreasing. Consider any recent lifestyle changes.",
        ),
        TrendDirection::Stable => {}
    }

    if pattern.average_cycle_length < 25 {
        push("Your cycles are shorter than average (21-35 days). Consider discussing with a healthcare provider.");
    } else if pattern.average_cycle_length > 35 {
        push("Your cycles are longer than average. This can be normal, but tracking symptoms may help.");
    } else {
        push("Your cycle length is within the normal range of 21-35 days.");
    }

    if let Some(profile) = lifestyle {
        if profile.stress_level == StressLevel::High {
            push("High stress levels can affect cycle regularity. Consider stress management techniques.");
        }
        if profile.exercise_frequency == ExerciseFrequency::Intense {
            push("Intense exercise can sometimes affect cycles. Monitor for any changes in pattern.");
        }
        if profile.sleep_quality == SleepQuality::Poor {
            push("Poor sleep quality can impact hormonal balance. Improving sleep may help cycle regularity.");
        }
        if profile.work_schedule == WorkSchedule::Shift {
            push("Shift work can disrupt circadian rhythms and affect cycles. Try to maintain consistent sleep patterns when possible.");
        }
        if profile.has_condition(HealthCondition::Pcos) {
            push("PCOS can cause irregular cycles. Your predictions account for this increased variability.");
        }
    }

    if pattern.data_quality < 50.0 {
        push("Logging period end dates will improve prediction accuracy.");
    }

    insights
}

/// Regularity review of the stored cycle and the logged history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CycleAnalysis {
    pub is_regular: bool,
    pub average_cycle_length: Option<u32>,
    /// Spread between the longest and shortest logged cycle.
    pub cycle_length_variation: Option<i64>,
    pub short_cycle_count: usize,
    pub long_cycle_count: usize,
    pub irregular_patterns: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn analyze_cycle_data(cycle_data: &CycleData, history: &[PeriodRecord]) -> CycleAnalysis {
    let mut analysis = CycleAnalysis::default();

    if cycle_data.start_date.is_none() {
        analysis
            .irregular_patterns
            .push("Insufficient data to analyze cycle patterns".into());
        analysis
            .recommendations
            .push("Track at least 3 complete cycles for personalized insights".into());
        return analysis;
    }

    analysis.average_cycle_length = Some(cycle_data.cycle_length);

    let cycle_length = cycle_data.cycle_length as i64;
    if cycle_length < TYPICAL_MIN_CYCLE {
        analysis.short_cycle_count = 1;
        analysis.irregular_patterns.push(
            "Your cycle appears to be shorter than the typical range (21-35 days)".into(),
        );
        analysis.recommendations.push(
            "Consider consulting a healthcare provider about your short cycle length".into(),
        );
    } else if cycle_length > TYPICAL_MAX_CYCLE {
        analysis.long_cycle_count = 1;
        analysis.irregular_patterns.push(
            "Your cycle appears to be longer than the typical range (21-35 days)".into(),
        );
        analysis.recommendations.push(
            "Long cycles can sometimes indicate hormonal imbalances or conditions like PCOS".into(),
        );
    }

    if cycle_data.period_length > 7 {
        analysis
            .irregular_patterns
            .push("Your period length is longer than the typical range (3-7 days)".into());
        analysis.recommendations.push(
            "Extended periods may indicate hormonal issues or other conditions requiring medical attention".into(),
        );
    } else if cycle_data.period_length < 2 {
        analysis
            .irregular_patterns
            .push("Your period length is shorter than the typical range (3-7 days)".into());
    }

    let lengths: Vec<i64> = history
        .windows(2)
        .map(|w| days_between(w[0].start_date, w[1].start_date))
        .collect();
    if lengths.len() > 1 {
        let (min, max) = lengths
            .iter()
            .fold((i64::MAX, i64::MIN), |(lo, hi), &l| (lo.min(l), hi.max(l)));
        let variation = max - min;
        analysis.cycle_length_variation = Some(variation);

        if variation > 7 {
            analysis.irregular_patterns.push(format!(
                "Your cycle length varies significantly ({variation} days difference)"
            ));
            analysis
                .recommendations
                .push("Cycle variations exceeding 7 days may indicate hormonal fluctuations".into());
        }

        analysis.short_cycle_count += lengths.iter().filter(|&&l| l < TYPICAL_MIN_CYCLE).count();
        analysis.long_cycle_count += lengths.iter().filter(|&&l| l > TYPICAL_MAX_CYCLE).count();
    }

    analysis.is_regular = analysis.irregular_patterns.is_empty();
    if analysis.is_regular {
        analysis
            .recommendations
            .push("Your cycle appears to be within typical ranges".into());
    } else {
        analysis
            .recommendations
            .push("Track your symptoms consistently to identify patterns".into());
        analysis
            .recommendations
            .push("Consider discussing your cycle patterns with a healthcare provider".into());
    }

    analysis
}

pub fn symptom_insights(logs: &[SymptomLog]) -> Vec<String> {
    if logs.len() < MIN_SYMPTOM_LOGS {
        return vec!["Continue tracking your symptoms to receive personalized insights".into()];
    }

    let mut counts: HashMap<SymptomCategory, usize> = HashMap::new();
    for log in logs {
        *counts.entry(log.symptom.category()).or_default() += 1;
    }
    let count = |category: SymptomCategory| counts.get(&category).copied().unwrap_or(0);

    let mut insights = Vec::new();
    if count(SymptomCategory::Mood) > 3 {
        insights.push("You've reported multiple mood-related symptoms. Regular exercise and stress-reduction techniques may help manage mood fluctuations".into());
    }
    if count(SymptomCategory::Body) > 3 {
        insights.push("For physical discomfort, consider heat therapy, gentle exercise, or over-the-counter pain relievers as needed".into());
    }
    if count(SymptomCategory::Sleep) > 2 {
        insights.push("Your sleep patterns may be affected by your cycle. Consider maintaining a consistent sleep schedule".into());
    }
    insights
}
