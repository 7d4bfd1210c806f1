use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;

/// One observed menstruation event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl PeriodRecord {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date,
        }
    }
}

/// Period records kept in ascending start-date order, unique by start date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<PeriodRecord>", into = "Vec<PeriodRecord>")]
pub struct PeriodHistory {
    records: Vec<PeriodRecord>,
}

impl PeriodHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from records in any order. Later duplicates of a
    /// start date are dropped.
    pub fn from_records(records: impl IntoIterator<Item = PeriodRecord>) -> Self {
        let mut history = Self::new();
        for record in records {
            history.insert(record);
        }
        history
    }

    /// Insert a record in order. Returns `false` if its start date is
    /// already present.
    pub fn insert(&mut self, record: PeriodRecord) -> bool {
        match self
            .records
            .binary_search_by_key(&record.start_date, |r| r.start_date)
        {
            Ok(_) => false,
            Err(pos) => {
                self.records.insert(pos, record);
                true
            }
        }
    }

    pub fn remove(&mut self, start_date: NaiveDate) -> Option<PeriodRecord> {
        let pos = self
            .records
            .binary_search_by_key(&start_date, |r| r.start_date)
            .ok()?;
        Some(self.records.remove(pos))
    }

    /// Correct the end date of an existing record.
    pub fn update_end(&mut self, start_date: NaiveDate, end_date: Option<NaiveDate>) -> bool {
        match self.records.iter_mut().find(|r| r.start_date == start_date) {
            Some(record) => {
                record.end_date = end_date;
                true
            }
            None => false,
        }
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<PeriodRecord>> for PeriodHistory {
    fn from(records: Vec<PeriodRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<PeriodHistory> for Vec<PeriodRecord> {
    fn from(history: PeriodHistory) -> Self {
        history.records
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Period,
    Fertile,
    Ovulation,
    Regular,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleDay {
    pub date: NaiveDate,
    pub phase: CyclePhase,
}

/// The current cycle state. `start_date`/`end_date` are derived from the
/// period days in `logs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleData {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cycle_length: u32,
    pub period_length: u32,
    #[serde(default)]
    pub logs: Vec<CycleDay>,
}

impl Default for CycleData {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_length: DEFAULT_PERIOD_LENGTH,
            logs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FertilityWindow {
    pub ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub is_ovulation_day: bool,
    pub is_within_fertile_window: bool,
    /// Only present while ovulation is still ahead.
    pub days_until_ovulation: Option<i64>,
    pub days_until_fertile_window: Option<i64>,
    pub fertility_percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictedCycle {
    pub period_start_date: NaiveDate,
    pub period_end_date: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    /// 1 for the next cycle, 2 for the one after, and so on.
    pub cycle_number: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SymptomCategory {
    Mood,
    Body,
    Flow,
    Sleep,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SymptomType {
    Cramps,
    Headache,
    Bloating,
    TenderBreasts,
    Backache,
    Nausea,
    Fatigue,
    Acne,
    Happy,
    Calm,
    Neutral,
    Sad,
    Irritable,
    Anxious,
    Light,
    Medium,
    Heavy,
    Spotting,
    SleepGood,
    SleepAverage,
    SleepPoor,
    SleepDuration,
}

impl SymptomType {
    pub fn category(self) -> SymptomCategory {
        use SymptomType::*;
        match self {
            Cramps | Headache | Bloating | TenderBreasts | Backache | Nausea | Fatigue | Acne => {
                SymptomCategory::Body
            }
            Happy | Calm | Neutral | Sad | Irritable | Anxious => SymptomCategory::Mood,
            Light | Medium | Heavy | Spotting => SymptomCategory::Flow,
            SleepGood | SleepAverage | SleepPoor | SleepDuration => SymptomCategory::Sleep,
        }
    }

    /// Upper bound of the intensity scale: hours for sleep duration, 1-3
    /// otherwise.
    pub fn max_intensity(self) -> u8 {
        match self {
            SymptomType::SleepDuration => 12,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLog {
    pub date: NaiveDate,
    pub symptom: SymptomType,
    pub intensity: Option<u8>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub total_periods: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

/// User preferences persisted alongside the tracked data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub show_fertility: bool,
    #[serde(default = "default_forecast_cycles")]
    pub forecast_cycles: u32,
}

fn default_forecast_cycles() -> u32 {
    5
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_fertility: false,
            forecast_cycles: default_forecast_cycles(),
        }
    }
}
