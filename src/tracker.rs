//! Caller-owned tracking state.
//!
//! `Tracker` bundles everything a user has logged and is the document the
//! vault persists. The engine functions only ever borrow from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dates::{add_days, days_between};
use crate::error::Result;
use crate::insights::personalized_insights;
use crate::lifestyle::LifestyleProfile;
use crate::models::{
    AppSettings, CycleData, CycleDay, CyclePhase, FertilityWindow, PeriodHistory, PeriodRecord,
    PredictedCycle, SymptomLog, SymptomType,
};
use crate::phase::{classify_phase, days_until_next_period, fertility_window_at, predict_future_cycles};
use crate::prediction::{
    cycle_length_from_history, predict_at, prediction_accuracy, AdaptivePrediction,
    PredictionOutcome,
};

/// Stored lengths only follow a new estimate once it differs by this many
/// days.
const LENGTH_UPDATE_THRESHOLD: i64 = 2;
/// Period days at most this far apart belong to the same period.
const MAX_GAP_WITHIN_PERIOD: i64 = 2;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    cycle_data: CycleData,
    history: PeriodHistory,
    #[serde(default)]
    lifestyle: Option<LifestyleProfile>,
    #[serde(default)]
    symptom_logs: Vec<SymptomLog>,
    #[serde(default)]
    pregnancy_mode: bool,
    #[serde(default)]
    settings: AppSettings,
    #[serde(default)]
    predictions: Vec<PredictionOutcome>,
}

/// Everything the dashboard shows for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub today: NaiveDate,
    pub phase: CyclePhase,
    pub days_until_next_period: Option<i64>,
    pub prediction: Option<AdaptivePrediction>,
    pub fertility: Option<FertilityWindow>,
    pub forecast: Vec<PredictedCycle>,
    pub insights: Vec<String>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_data(&self) -> &CycleData {
        &self.cycle_data
    }

    pub fn history(&self) -> &PeriodHistory {
        &self.history
    }

    pub fn lifestyle(&self) -> Option<&LifestyleProfile> {
        self.lifestyle.as_ref()
    }

    pub fn symptom_logs(&self) -> &[SymptomLog] {
        &self.symptom_logs
    }

    pub fn pregnancy_mode(&self) -> bool {
        self.pregnancy_mode
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AppSettings {
        &mut self.settings
    }

    pub fn predictions(&self) -> &[PredictionOutcome] {
        &self.predictions
    }

    pub fn set_lifestyle(&mut self, profile: LifestyleProfile) -> Result<()> {
        profile.validate()?;
        self.lifestyle = Some(profile);
        Ok(())
    }

    pub fn clear_lifestyle(&mut self) {
        self.lifestyle = None;
    }

    pub fn set_pregnancy_mode(&mut self, enabled: bool) {
        self.pregnancy_mode = enabled;
    }

    pub fn toggle_pregnancy_mode(&mut self) -> bool {
        self.pregnancy_mode = !self.pregnancy_mode;
        self.pregnancy_mode
    }

    /// Mark or unmark `date` as a period day. Returns `false` when nothing
    /// changed.
    pub fn log_period_day(&mut self, date: NaiveDate, active: bool) -> bool {
        let mut unlogged_start = None;
        let existing = self.cycle_data.logs.iter().position(|d| d.date == date);
        match (active, existing) {
            (true, None) => {
                let pos = self.cycle_data.logs.partition_point(|d| d.date < date);
                self.cycle_data.logs.insert(
                    pos,
                    CycleDay {
                        date,
                        phase: CyclePhase::Period,
                    },
                );
            }
            (false, Some(pos)) => {
                self.cycle_data.logs.remove(pos);
                if self.history.remove(date).is_some() {
                    debug!(%date, "dropped period whose first day was unlogged");
                    unlogged_start = Some(date);
                }
            }
            _ => return false,
        }

        self.rederive_bounds();
        self.sync_history_from_logs(unlogged_start);
        true
    }

    /// Fill in `period_length` period days starting at `start`.
    pub fn log_predicted_period_days(&mut self, start: NaiveDate) {
        for offset in 0..self.cycle_data.period_length as i64 {
            let date = add_days(start, offset);
            if !self.cycle_data.logs.iter().any(|d| d.date == date) {
                let pos = self.cycle_data.logs.partition_point(|d| d.date < date);
                self.cycle_data.logs.insert(
                    pos,
                    CycleDay {
                        date,
                        phase: CyclePhase::Period,
                    },
                );
            }
        }
        self.rederive_bounds();
        self.sync_history_from_logs(None);
    }

    /// Record a period in the history. Duplicated start dates are ignored.
    /// A period newer than every recorded one resolves the pending
    /// prediction.
    pub fn add_period_to_history(&mut self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        let is_newest = self.history.last().map_or(true, |r| r.start_date < start);
        if !self.insert_period(start, end) {
            return false;
        }

        if is_newest {
            if let Some(pending) = self.predictions.iter_mut().rev().find(|p| p.actual.is_none()) {
                pending.actual = Some(start);
            }
        }
        true
    }

    /// Correct the end date of a recorded period.
    pub fn update_period_end(&mut self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        self.history.update_end(start, end)
    }

    /// Delete a recorded period together with its logged days. Prediction
    /// outcomes resolved by it are forgotten.
    pub fn remove_period(&mut self, start: NaiveDate) -> bool {
        let Some(removed) = self.history.remove(start) else {
            return false;
        };
        let end = removed.end_date.unwrap_or(start);
        self.cycle_data.logs.retain(|d| d.date < start || d.date > end);
        self.predictions.retain(|p| p.actual != Some(start));
        info!(%start, "removed period");

        self.rederive_bounds();
        self.sync_history_from_logs(None);
        true
    }

    /// Replace any log for the same date and symptom.
    pub fn add_symptom_log(&mut self, mut log: SymptomLog) {
        log.intensity = log
            .intensity
            .map(|i| i.clamp(1, log.symptom.max_intensity()));
        self.symptom_logs
            .retain(|l| !(l.date == log.date && l.symptom == log.symptom));
        self.symptom_logs.push(log);
    }

    pub fn remove_symptom_log(&mut self, date: NaiveDate, symptom: SymptomType) -> bool {
        let before = self.symptom_logs.len();
        self.symptom_logs
            .retain(|l| !(l.date == date && l.symptom == symptom));
        self.symptom_logs.len() != before
    }

    /// The most recent known period start.
    pub fn last_period_start(&self) -> Option<NaiveDate> {
        let logged = self.history.last().map(|r| r.start_date);
        match (logged, self.cycle_data.start_date) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Adaptive prediction without touching stored state.
    pub fn adaptive_prediction_at(&self, today: NaiveDate) -> Option<AdaptivePrediction> {
        if self.history.is_empty() {
            return None;
        }
        let last_start = self.last_period_start()?;
        let mut prediction = predict_at(
            last_start,
            self.history.records(),
            self.lifestyle.as_ref(),
            today,
        );

        let scored: Vec<PredictionOutcome> = self
            .predictions
            .iter()
            .filter(|p| p.actual.is_some())
            .cloned()
            .collect();
        if !scored.is_empty() {
            prediction.pattern.prediction_accuracy = Some(prediction_accuracy(&scored));
        }
        Some(prediction)
    }

    /// Run the adaptive prediction and let the stored lengths follow it when
    /// it has drifted far enough.
    pub fn refresh_at(&mut self, today: NaiveDate) -> Option<AdaptivePrediction> {
        let prediction = self.adaptive_prediction_at(today)?;
        self.follow_cycle_length(
            prediction.cycle_length_prediction,
            Some(prediction.period_length_prediction),
        );

        match self.predictions.last_mut() {
            Some(pending) if pending.actual.is_none() => {
                pending.predicted = prediction.next_period_date;
            }
            _ => self.predictions.push(PredictionOutcome {
                predicted: prediction.next_period_date,
                actual: None,
            }),
        }
        Some(prediction)
    }

    /// Cycle data as the calculators should see it: anchored on the latest
    /// period start and, when available, the adaptive cycle length.
    pub fn effective_cycle_data(&self, prediction: Option<&AdaptivePrediction>) -> CycleData {
        let mut data = self.cycle_data.clone();
        data.start_date = self.last_period_start();
        if let Some(prediction) = prediction {
            data.cycle_length = prediction.cycle_length_prediction;
        }
        data
    }

    pub fn phase_on(&self, date: NaiveDate, today: NaiveDate) -> CyclePhase {
        let prediction = self.adaptive_prediction_at(today);
        classify_phase(
            date,
            &self.effective_cycle_data(prediction.as_ref()),
            self.pregnancy_mode,
        )
    }

    pub fn overview_at(&self, today: NaiveDate) -> Overview {
        let prediction = self.adaptive_prediction_at(today);
        let effective = self.effective_cycle_data(prediction.as_ref());

        let days_until_next_period = match &prediction {
            Some(p) if !self.pregnancy_mode => {
                Some(days_between(today, p.next_period_date).max(0))
            }
            _ => days_until_next_period(
                effective.start_date,
                effective.cycle_length,
                self.pregnancy_mode,
                today,
            ),
        };

        let (forecast, fertility) = if self.pregnancy_mode {
            (Vec::new(), None)
        } else {
            let forecast =
                predict_future_cycles(&effective, self.settings.forecast_cycles, false);
            let fertility = self
                .settings
                .show_fertility
                .then(|| fertility_window_at(&effective, today))
                .flatten();
            (forecast, fertility)
        };

        let insights = match &prediction {
            Some(p) => personalized_insights(&p.pattern, self.lifestyle.as_ref()),
            None => Vec::new(),
        };

        Overview {
            today,
            phase: classify_phase(today, &effective, self.pregnancy_mode),
            days_until_next_period,
            prediction,
            fertility,
            forecast,
            insights,
        }
    }

    /// Adopt new lengths once the cycle length has drifted far enough. The
    /// period length only moves together with the cycle length.
    fn follow_cycle_length(&mut self, cycle_length: u32, period_length: Option<u32>) {
        let drift = (cycle_length as i64 - self.cycle_data.cycle_length as i64).abs();
        if drift < LENGTH_UPDATE_THRESHOLD {
            return;
        }
        info!(
            from = self.cycle_data.cycle_length,
            to = cycle_length,
            ?period_length,
            "updating stored cycle length"
        );
        self.cycle_data.cycle_length = cycle_length;
        if let Some(period_length) = period_length {
            self.cycle_data.period_length = period_length;
        }
    }

    fn insert_period(&mut self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        if !self.history.insert(PeriodRecord::new(start, end)) {
            return false;
        }
        info!(%start, records = self.history.len(), "added period to history");

        if self.history.len() >= 2 {
            let averaged = cycle_length_from_history(self.history.records());
            self.follow_cycle_length(averaged, None);
        }
        true
    }

    /// Point outcomes resolved by any of `starts` at `start` instead.
    fn carry_outcomes(&mut self, starts: &[NaiveDate], start: NaiveDate) {
        for outcome in &mut self.predictions {
            if outcome.actual.is_some_and(|actual| starts.contains(&actual)) {
                outcome.actual = Some(start);
            }
        }
    }

    fn rederive_bounds(&mut self) {
        let mut period_days = self
            .cycle_data
            .logs
            .iter()
            .filter(|d| d.phase == CyclePhase::Period)
            .map(|d| d.date);
        let first = period_days.next();
        let last = period_days.last().or(first);
        self.cycle_data.start_date = first;
        self.cycle_data.end_date = last;
    }

    /// Group logged period days into periods and make sure each one is in
    /// the history with its current end date.
    ///
    /// A period whose start moved, because an earlier day was logged or its
    /// first day was unlogged (`unlogged_start`), replaces the old record
    /// and keeps the prediction outcome it resolved.
    fn sync_history_from_logs(&mut self, unlogged_start: Option<NaiveDate>) {
        let days: Vec<NaiveDate> = self
            .cycle_data
            .logs
            .iter()
            .filter(|d| d.phase == CyclePhase::Period)
            .map(|d| d.date)
            .collect();
        let Some((&first, rest)) = days.split_first() else {
            return;
        };

        let mut periods = Vec::new();
        let (mut start, mut end) = (first, first);
        for &day in rest {
            if days_between(end, day) <= MAX_GAP_WITHIN_PERIOD {
                end = day;
            } else {
                periods.push((start, end));
                start = day;
                end = day;
            }
        }
        periods.push((start, end));

        for (start, end) in periods {
            let mut replaced: Vec<NaiveDate> = self
                .history
                .records()
                .iter()
                .map(|r| r.start_date)
                .filter(|d| *d > start && *d <= end)
                .collect();
            for stale in &replaced {
                self.history.remove(*stale);
            }
            if let Some(old) = unlogged_start {
                if old < start && days_between(old, start) <= MAX_GAP_WITHIN_PERIOD {
                    replaced.push(old);
                }
            }

            if self.history.update_end(start, Some(end)) {
                self.carry_outcomes(&replaced, start);
            } else if replaced.is_empty() {
                self.add_period_to_history(start, Some(end));
            } else {
                self.carry_outcomes(&replaced, start);
                self.insert_period(start, Some(end));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifestyle::{HealthCondition, StressLevel};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log_period(tracker: &mut Tracker, start: &str, days: i64) {
        for offset in 0..days {
            tracker.log_period_day(add_days(date(start), offset), true);
        }
    }

    #[test]
    fn logging_days_derives_bounds_and_history() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 5);

        assert_eq!(tracker.cycle_data().start_date, Some(date("2024-01-01")));
        assert_eq!(tracker.cycle_data().end_date, Some(date("2024-01-05")));
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(
            tracker.history().records()[0].end_date,
            Some(date("2024-01-05"))
        );
        // logging the same day twice is a no-op
        assert!(!tracker.log_period_day(date("2024-01-03"), true));
    }

    #[test]
    fn unlogging_days_rederives_bounds() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 3);

        assert!(tracker.log_period_day(date("2024-01-01"), false));
        assert_eq!(tracker.cycle_data().start_date, Some(date("2024-01-02")));
        let starts: Vec<_> = tracker.history().records().iter().map(|r| r.start_date).collect();
        assert_eq!(starts, vec![date("2024-01-02")]);

        tracker.log_period_day(date("2024-01-02"), false);
        tracker.log_period_day(date("2024-01-03"), false);
        assert_eq!(tracker.cycle_data().start_date, None);
        assert_eq!(tracker.cycle_data().end_date, None);
        assert!(!tracker.log_period_day(date("2024-01-03"), false));
    }

    #[test]
    fn logging_an_earlier_day_moves_the_period_start() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-02", 3);
        tracker.log_period_day(date("2024-01-01"), true);

        let records = tracker.history().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_date, date("2024-01-01"));
        assert_eq!(records[0].end_date, Some(date("2024-01-04")));
    }

    #[test]
    fn separate_periods_become_separate_records() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 5);
        log_period(&mut tracker, "2024-01-31", 5);

        // the stored cycle spans every logged period day
        assert_eq!(tracker.cycle_data().start_date, Some(date("2024-01-01")));
        assert_eq!(tracker.cycle_data().end_date, Some(date("2024-02-04")));
        assert_eq!(tracker.history().len(), 2);
        assert_eq!(tracker.last_period_start(), Some(date("2024-01-31")));
        // 30-day average differs from the default 28 by two days
        assert_eq!(tracker.cycle_data().cycle_length, 30);
    }

    #[test]
    fn history_average_respects_hysteresis() {
        let mut tracker = Tracker::new();
        tracker.add_period_to_history(date("2024-01-01"), None);
        tracker.add_period_to_history(date("2024-01-30"), None);
        // 29 is within one day of 28
        assert_eq!(tracker.cycle_data().cycle_length, 28);
        assert!(!tracker.add_period_to_history(date("2024-01-30"), None));
    }

    #[test]
    fn predicted_days_fill_a_period() {
        let mut tracker = Tracker::new();
        tracker.log_predicted_period_days(date("2024-03-01"));
        assert_eq!(tracker.cycle_data().logs.len(), 5);
        assert_eq!(tracker.cycle_data().end_date, Some(date("2024-03-05")));
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn refresh_follows_adaptive_prediction() {
        let mut tracker = Tracker::new();
        for start in ["2024-01-01", "2024-01-29", "2024-02-26", "2024-03-25"] {
            tracker.add_period_to_history(date(start), Some(add_days(date(start), 5)));
        }
        assert_eq!(tracker.cycle_data().cycle_length, 28);

        // high stress, PCOS and thyroid add two days
        tracker
            .set_lifestyle(LifestyleProfile {
                stress_level: StressLevel::High,
                health_conditions: vec![HealthCondition::Pcos, HealthCondition::ThyroidDisorder],
                ..LifestyleProfile::default()
            })
            .unwrap();
        let prediction = tracker.refresh_at(date("2024-03-28")).unwrap();
        assert_eq!(prediction.cycle_length_prediction, 30);
        assert_eq!(tracker.cycle_data().cycle_length, 30);
        assert_eq!(tracker.cycle_data().period_length, 6);
        assert_eq!(prediction.next_period_date, date("2024-04-24"));
        assert_eq!(tracker.predictions().len(), 1);
    }

    #[test]
    fn period_length_waits_for_cycle_length_drift() {
        let mut tracker = Tracker::new();
        for start in ["2024-01-01", "2024-01-29", "2024-02-26", "2024-03-25"] {
            tracker.add_period_to_history(date(start), Some(add_days(date(start), 7)));
        }
        let prediction = tracker.refresh_at(date("2024-03-28")).unwrap();
        assert_eq!(prediction.period_length_prediction, 8);
        assert_eq!(tracker.cycle_data().cycle_length, 28);
        assert_eq!(tracker.cycle_data().period_length, 5);
    }

    #[test]
    fn backfilled_start_keeps_its_prediction_outcome() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 5);
        let first = tracker.refresh_at(date("2024-01-03")).unwrap();
        assert_eq!(first.next_period_date, date("2024-01-29"));

        log_period(&mut tracker, "2024-01-30", 5);
        assert_eq!(tracker.predictions()[0].actual, Some(date("2024-01-30")));
        tracker.refresh_at(date("2024-02-01")).unwrap();
        assert_eq!(tracker.predictions().len(), 2);

        // the period really began a day earlier
        tracker.log_period_day(date("2024-01-29"), true);
        let starts: Vec<_> = tracker.history().records().iter().map(|r| r.start_date).collect();
        assert_eq!(starts, vec![date("2024-01-01"), date("2024-01-29")]);
        assert_eq!(tracker.predictions()[0].actual, Some(date("2024-01-29")));
        assert_eq!(tracker.predictions()[1].actual, None);

        // and unlogging it again moves the outcome back
        tracker.log_period_day(date("2024-01-29"), false);
        assert_eq!(tracker.predictions()[0].actual, Some(date("2024-01-30")));
        assert_eq!(tracker.predictions()[1].actual, None);
    }

    #[test]
    fn period_end_can_be_corrected() {
        let mut tracker = Tracker::new();
        tracker.add_period_to_history(date("2024-01-01"), None);
        assert!(tracker.update_period_end(date("2024-01-01"), Some(date("2024-01-05"))));
        assert_eq!(
            tracker.history().records()[0].end_date,
            Some(date("2024-01-05"))
        );
        assert!(!tracker.update_period_end(date("2024-02-01"), None));
    }

    #[test]
    fn removing_a_period_drops_its_days_and_outcome() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 5);
        tracker.refresh_at(date("2024-01-03")).unwrap();
        log_period(&mut tracker, "2024-01-29", 5);
        assert_eq!(tracker.predictions()[0].actual, Some(date("2024-01-29")));

        assert!(tracker.remove_period(date("2024-01-29")));
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.cycle_data().logs.len(), 5);
        assert_eq!(tracker.cycle_data().end_date, Some(date("2024-01-05")));
        assert!(tracker.predictions().is_empty());
        assert!(!tracker.remove_period(date("2024-01-29")));
    }

    #[test]
    fn prediction_accuracy_is_tracked() {
        let mut tracker = Tracker::new();
        tracker.add_period_to_history(date("2024-01-01"), Some(date("2024-01-05")));
        tracker.add_period_to_history(date("2024-01-29"), Some(date("2024-02-02")));
        let first = tracker.refresh_at(date("2024-02-01")).unwrap();
        assert_eq!(first.next_period_date, date("2024-02-26"));
        assert_eq!(first.pattern.prediction_accuracy, None);

        tracker.add_period_to_history(date("2024-02-27"), Some(date("2024-03-02")));
        let second = tracker.refresh_at(date("2024-03-01")).unwrap();
        assert_eq!(second.pattern.prediction_accuracy, Some(100.0));
        assert_eq!(tracker.predictions().len(), 2);
    }

    #[test]
    fn overview_uses_latest_period() {
        let mut tracker = Tracker::new();
        tracker.settings_mut().show_fertility = true;
        log_period(&mut tracker, "2024-01-01", 5);
        log_period(&mut tracker, "2024-01-29", 5);

        let today = date("2024-02-01");
        let overview = tracker.overview_at(today);
        assert_eq!(overview.phase, CyclePhase::Period);
        let prediction = overview.prediction.as_ref().unwrap();
        assert_eq!(prediction.next_period_date, date("2024-02-26"));
        assert_eq!(overview.days_until_next_period, Some(25));
        assert_eq!(overview.forecast.len(), 5);
        assert_eq!(overview.forecast[0].period_start_date, date("2024-02-26"));
        let fertility = overview.fertility.unwrap();
        assert_eq!(fertility.ovulation_date, date("2024-02-12"));
        assert!(!overview.insights.is_empty());
    }

    #[test]
    fn pregnancy_mode_suppresses_cycle_outputs() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 5);
        assert!(tracker.toggle_pregnancy_mode());

        let overview = tracker.overview_at(date("2024-01-03"));
        assert_eq!(overview.phase, CyclePhase::Unknown);
        assert!(overview.forecast.is_empty());
        assert!(overview.fertility.is_none());
        assert_eq!(overview.days_until_next_period, None);
    }

    #[test]
    fn empty_tracker_has_no_prediction() {
        let tracker = Tracker::new();
        let overview = tracker.overview_at(date("2024-01-03"));
        assert!(overview.prediction.is_none());
        assert_eq!(overview.phase, CyclePhase::Unknown);
        assert_eq!(overview.days_until_next_period, None);
        assert!(overview.forecast.is_empty());
    }

    #[test]
    fn lifestyle_is_validated() {
        let mut tracker = Tracker::new();
        let invalid = LifestyleProfile {
            age: Some(70),
            ..LifestyleProfile::default()
        };
        assert!(tracker.set_lifestyle(invalid).is_err());
        assert!(tracker.lifestyle().is_none());

        let pcos = LifestyleProfile {
            health_conditions: vec![HealthCondition::Pcos],
            ..LifestyleProfile::default()
        };
        tracker.set_lifestyle(pcos).unwrap();
        assert!(tracker.lifestyle().is_some());
    }

    #[test]
    fn symptom_logs_upsert_and_clamp() {
        let mut tracker = Tracker::new();
        let log = |symptom, intensity| SymptomLog {
            date: date("2024-01-02"),
            symptom,
            intensity: Some(intensity),
            notes: String::new(),
        };
        tracker.add_symptom_log(log(SymptomType::Cramps, 9));
        tracker.add_symptom_log(log(SymptomType::Cramps, 2));
        tracker.add_symptom_log(log(SymptomType::SleepDuration, 9));

        assert_eq!(tracker.symptom_logs().len(), 2);
        assert_eq!(tracker.symptom_logs()[0].intensity, Some(2));
        assert_eq!(tracker.symptom_logs()[1].intensity, Some(9));

        assert!(tracker.remove_symptom_log(date("2024-01-02"), SymptomType::Cramps));
        assert!(!tracker.remove_symptom_log(date("2024-01-02"), SymptomType::Cramps));
    }

    #[test]
    fn tracker_round_trips_through_json() {
        let mut tracker = Tracker::new();
        log_period(&mut tracker, "2024-01-01", 4);
        let json = serde_json::to_string(&tracker).unwrap();
        let restored: Tracker = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tracker);
    }
}
