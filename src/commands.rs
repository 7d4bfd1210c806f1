use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::dates::parse_date;
use crate::error::{Error, Result};
use crate::insights::{analyze_cycle_data, personalized_insights, symptom_insights, CycleAnalysis};
use crate::lifestyle::LifestyleProfile;
use crate::models::{
    AppSettings, CycleData, CyclePhase, CycleStats, FertilityWindow, PredictedCycle, SymptomLog,
    SymptomType,
};
use crate::pattern::{analyze_pattern_at, CyclePattern};
use crate::phase::{fertility_window_at, predict_future_cycles};
use crate::prediction::{cycle_stats, AdaptivePrediction};
use crate::storage::Vault;
use crate::tracker::{Overview, Tracker};

/// The decrypted tracker and passphrase while unlocked.
///
/// `today` is the reference date for every prediction the session makes.
pub struct Session {
    vault: Vault,
    today: NaiveDate,
    passphrase: Option<Zeroizing<String>>,
    tracker: Option<Tracker>,
}

impl Session {
    pub fn new(vault: Vault, today: NaiveDate) -> Self {
        Self {
            vault,
            today,
            passphrase: None,
            tracker: None,
        }
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_unlocked(&self) -> bool {
        self.tracker.is_some()
    }

    /// Drop the passphrase and data from memory.
    pub fn lock(&mut self) {
        self.passphrase = None;
        self.tracker = None;
    }

    fn tracker(&self) -> Result<&Tracker> {
        self.tracker.as_ref().ok_or(Error::Locked)
    }

    fn save(&self) -> Result<()> {
        match (self.passphrase.as_ref(), self.tracker.as_ref()) {
            (Some(passphrase), Some(tracker)) => Ok(self.vault.save(passphrase, tracker)?),
            _ => Err(Error::Locked),
        }
    }

    /// Apply `change` to the tracker, rerun the adaptive prediction so the
    /// stored lengths stay current, and persist the result.
    fn update<T>(&mut self, change: impl FnOnce(&mut Tracker) -> Result<T>) -> Result<T> {
        let tracker = self.tracker.as_mut().ok_or(Error::Locked)?;
        let out = change(tracker)?;
        tracker.refresh_at(self.today);
        self.save()?;
        Ok(out)
    }
}

/// Pattern plus regularity review, as shown by `analyze`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub pattern: CyclePattern,
    pub analysis: CycleAnalysis,
}

pub fn is_setup(session: &Session) -> bool {
    session.vault.exists()
}

/// Create a fresh vault and unlock it.
pub fn setup(session: &mut Session, passphrase: String, forecast_cycles: u32) -> Result<()> {
    let mut tracker = Tracker::new();
    tracker.settings_mut().forecast_cycles = forecast_cycles;
    session.vault.save(&passphrase, &tracker)?;
    info!(path = %session.vault.path().display(), "created vault");

    session.passphrase = Some(Zeroizing::new(passphrase));
    session.tracker = Some(tracker);
    Ok(())
}

pub fn unlock(session: &mut Session, passphrase: String) -> Result<()> {
    let tracker = session.vault.load(&passphrase).map_err(|e| {
        warn!("unlock failed");
        e
    })?;
    session.passphrase = Some(Zeroizing::new(passphrase));
    session.tracker = Some(tracker);
    Ok(())
}

pub fn log_day(session: &mut Session, date: &str, active: bool) -> Result<CycleData> {
    let date = parse_date(date)?;
    session.update(|tracker| {
        tracker.log_period_day(date, active);
        Ok(tracker.cycle_data().clone())
    })
}

pub fn log_predicted_period(session: &mut Session, start: &str) -> Result<CycleData> {
    let start = parse_date(start)?;
    session.update(|tracker| {
        tracker.log_predicted_period_days(start);
        Ok(tracker.cycle_data().clone())
    })
}

/// Returns `false` when a period with the same start is already recorded.
pub fn add_period(session: &mut Session, start: &str, end: Option<&str>) -> Result<bool> {
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?;
    if let Some(end) = end {
        check_period(start, end)?;
    }
    session.update(|tracker| Ok(tracker.add_period_to_history(start, end)))
}

/// Change the end date of a recorded period. Returns `false` when no period
/// starts on `start`.
pub fn edit_period(session: &mut Session, start: &str, end: Option<&str>) -> Result<bool> {
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?;
    if let Some(end) = end {
        check_period(start, end)?;
    }
    session.update(|tracker| Ok(tracker.update_period_end(start, end)))
}

/// Delete a recorded period and the days logged for it.
pub fn remove_period(session: &mut Session, start: &str) -> Result<bool> {
    let start = parse_date(start)?;
    session.update(|tracker| Ok(tracker.remove_period(start)))
}

fn check_period(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::InvalidPeriod(format!("end {end} is before start {start}")));
    }
    Ok(())
}

pub fn set_lifestyle(session: &mut Session, json: &str) -> Result<LifestyleProfile> {
    let profile: LifestyleProfile =
        serde_json::from_str(json).map_err(|e| Error::InvalidLifestyle(e.to_string()))?;
    session.update(|tracker| {
        tracker.set_lifestyle(profile.clone())?;
        Ok(profile)
    })
}

pub fn clear_lifestyle(session: &mut Session) -> Result<()> {
    session.update(|tracker| {
        tracker.clear_lifestyle();
        Ok(())
    })
}

pub fn log_symptom(
    session: &mut Session,
    date: &str,
    symptom: SymptomType,
    intensity: Option<u8>,
    notes: String,
) -> Result<()> {
    let date = parse_date(date)?;
    session.update(|tracker| {
        tracker.add_symptom_log(SymptomLog {
            date,
            symptom,
            intensity,
            notes,
        });
        Ok(())
    })
}

pub fn remove_symptom(session: &mut Session, date: &str, symptom: SymptomType) -> Result<bool> {
    let date = parse_date(date)?;
    session.update(|tracker| Ok(tracker.remove_symptom_log(date, symptom)))
}

pub fn set_pregnancy_mode(session: &mut Session, enabled: bool) -> Result<()> {
    session.update(|tracker| {
        tracker.set_pregnancy_mode(enabled);
        Ok(())
    })
}

/// Pattern and regularity review of the cycle the calculators see.
pub fn analyze(session: &Session) -> Result<CycleReport> {
    let tracker = session.tracker()?;
    let today = session.today;
    let prediction = tracker.adaptive_prediction_at(today);
    Ok(CycleReport {
        pattern: analyze_pattern_at(tracker.history().records(), tracker.lifestyle(), today),
        analysis: analyze_cycle_data(
            &tracker.effective_cycle_data(prediction.as_ref()),
            tracker.history().records(),
        ),
    })
}

/// Run the adaptive prediction and persist any length updates it causes.
pub fn predict(session: &mut Session) -> Result<Option<AdaptivePrediction>> {
    let today = session.today;
    session.update(|tracker| Ok(tracker.adaptive_prediction_at(today)))
}

pub fn phase(session: &Session, date: &str) -> Result<CyclePhase> {
    let date = parse_date(date)?;
    Ok(session.tracker()?.phase_on(date, session.today))
}

pub fn fertility(session: &Session) -> Result<Option<FertilityWindow>> {
    let today = session.today;
    let tracker = session.tracker()?;
    if tracker.pregnancy_mode() {
        return Ok(None);
    }
    let prediction = tracker.adaptive_prediction_at(today);
    Ok(fertility_window_at(
        &tracker.effective_cycle_data(prediction.as_ref()),
        today,
    ))
}

pub fn forecast(session: &Session, count: Option<u32>) -> Result<Vec<PredictedCycle>> {
    let tracker = session.tracker()?;
    let prediction = tracker.adaptive_prediction_at(session.today);
    Ok(predict_future_cycles(
        &tracker.effective_cycle_data(prediction.as_ref()),
        count.unwrap_or(tracker.settings().forecast_cycles),
        tracker.pregnancy_mode(),
    ))
}

pub fn stats(session: &Session) -> Result<CycleStats> {
    Ok(cycle_stats(session.tracker()?.history().records()))
}

pub fn insights(session: &Session) -> Result<Vec<String>> {
    let tracker = session.tracker()?;
    let pattern =
        analyze_pattern_at(tracker.history().records(), tracker.lifestyle(), session.today);
    let mut insights = personalized_insights(&pattern, tracker.lifestyle());
    insights.extend(symptom_insights(tracker.symptom_logs()));
    Ok(insights)
}

pub fn overview(session: &Session) -> Result<Overview> {
    Ok(session.tracker()?.overview_at(session.today))
}

pub fn get_settings(session: &Session) -> Result<AppSettings> {
    Ok(session.tracker()?.settings().clone())
}

pub fn update_settings(
    session: &mut Session,
    show_fertility: Option<bool>,
    forecast_cycles: Option<u32>,
) -> Result<AppSettings> {
    session.update(|tracker| {
        let settings = tracker.settings_mut();
        if let Some(show) = show_fertility {
            settings.show_fertility = show;
        }
        if let Some(count) = forecast_cycles {
            settings.forecast_cycles = count;
        }
        Ok(settings.clone())
    })
}

pub fn export_data(session: &Session) -> Result<String> {
    Ok(serde_json::to_string_pretty(session.tracker()?)?)
}

pub fn wipe_all_data(session: &mut Session) -> Result<()> {
    session.lock();
    session.vault.wipe()?;
    Ok(())
}
