//! Property-based tests for the prediction engine

use chrono::NaiveDate;
use proptest::prelude::*;

use cyclecast::dates::add_days;
use cyclecast::lifestyle::{HealthCondition, LifestyleProfile, SleepQuality, StressLevel, WorkSchedule};
use cyclecast::models::PeriodRecord;
use cyclecast::{analyze_pattern_at, predict_at, Tracker};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn build_history(entries: &[(i64, Option<i64>)]) -> Vec<PeriodRecord> {
    let mut start = base_date();
    entries
        .iter()
        .map(|(gap, period_days)| {
            start = add_days(start, *gap);
            PeriodRecord::new(start, period_days.map(|days| add_days(start, days - 1)))
        })
        .collect()
}

// Gaps of any size, including ones the analyzer discards
prop_compose! {
    fn any_history()(
        entries in prop::collection::vec((1i64..90, prop::option::of(1i64..14)), 0..12)
    ) -> Vec<PeriodRecord> {
        build_history(&entries)
    }
}

// Only plausible, mid-range cycles
prop_compose! {
    fn regular_history()(
        entries in prop::collection::vec((24i64..=40, prop::option::of(3i64..8)), 2..10)
    ) -> Vec<PeriodRecord> {
        build_history(&entries)
    }
}

prop_compose! {
    fn lifestyle()(
        age in prop::option::of(10u8..=65),
        stress in prop_oneof![
            Just(StressLevel::Low),
            Just(StressLevel::Moderate),
            Just(StressLevel::High),
        ],
        sleep in prop_oneof![Just(SleepQuality::Poor), Just(SleepQuality::Excellent)],
        shift_work in any::<bool>(),
    ) -> LifestyleProfile {
        LifestyleProfile {
            age,
            stress_level: stress,
            sleep_quality: sleep,
            work_schedule: if shift_work { WorkSchedule::Shift } else { WorkSchedule::Regular },
            ..LifestyleProfile::default()
        }
    }
}

proptest! {
    #[test]
    fn prop_scores_stay_within_bounds(
        history in any_history(),
        profile in prop::option::of(lifestyle()),
        days_after in 0i64..400,
    ) {
        let today = add_days(history.last().map_or(base_date(), |r| r.start_date), days_after);
        let pattern = analyze_pattern_at(&history, profile.as_ref(), today);

        prop_assert!((0.0..=100.0).contains(&pattern.confidence));
        prop_assert!((0.0..=100.0).contains(&pattern.data_quality));
        prop_assert!(pattern.confidence >= pattern.data_quality);
        prop_assert!(pattern.cycle_variability >= 0.0);
        prop_assert!((21..=45).contains(&pattern.average_cycle_length));
    }

    #[test]
    fn prop_prediction_sits_inside_its_range(
        history in any_history(),
        profile in prop::option::of(lifestyle()),
    ) {
        let last_start = history.last().map_or(base_date(), |r| r.start_date);
        let prediction = predict_at(last_start, &history, profile.as_ref(), add_days(last_start, 3));

        prop_assert!(prediction.prediction_range.earliest <= prediction.next_period_date);
        prop_assert!(prediction.next_period_date <= prediction.prediction_range.latest);
        prop_assert!(prediction.next_period_date > last_start);
    }

    #[test]
    fn prop_prediction_is_deterministic(
        history in any_history(),
        profile in prop::option::of(lifestyle()),
    ) {
        let last_start = history.last().map_or(base_date(), |r| r.start_date);
        let today = add_days(last_start, 10);
        let first = predict_at(last_start, &history, profile.as_ref(), today);
        let second = predict_at(last_start, &history, profile.as_ref(), today);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_pcos_adds_one_day(history in regular_history()) {
        let last_start = history.last().map(|r| r.start_date).unwrap();
        let today = add_days(last_start, 2);
        let without = LifestyleProfile::default();
        let with = LifestyleProfile {
            health_conditions: vec![HealthCondition::Pcos],
            ..LifestyleProfile::default()
        };

        let base = predict_at(last_start, &history, Some(&without), today);
        let pcos = predict_at(last_start, &history, Some(&with), today);
        prop_assert_eq!(pcos.cycle_length_prediction, base.cycle_length_prediction + 1);
        prop_assert_eq!(pcos.next_period_date, add_days(base.next_period_date, 1));
    }

    #[test]
    fn prop_logged_history_stays_sorted_and_unique(
        offsets in prop::collection::vec((0i64..200, any::<bool>()), 1..40)
    ) {
        let mut tracker = Tracker::new();
        for (offset, active) in offsets {
            tracker.log_period_day(add_days(base_date(), offset), active);
        }

        let starts: Vec<NaiveDate> = tracker.history().records().iter().map(|r| r.start_date).collect();
        prop_assert!(starts.windows(2).all(|w| w[0] < w[1]));

        let data = tracker.cycle_data();
        prop_assert_eq!(data.start_date, data.logs.first().map(|d| d.date));
        prop_assert_eq!(data.end_date, data.logs.last().map(|d| d.date));
    }
}
