//! Baseline calendar math driven directly by the stored cycle and period
//! lengths. Ovulation is placed 14 days before the next period, with a
//! fertile window from five days before to one day after it.

use chrono::NaiveDate;

use crate::dates::{self, add_days, days_between};
use crate::models::{CycleData, CyclePhase, FertilityWindow, PredictedCycle};

const LUTEAL_PHASE_DAYS: i64 = 14;
const DAYS_BEFORE_OVULATION: i64 = 5;
const DAYS_AFTER_OVULATION: i64 = 1;
const FERTILITY_DROP_PER_DAY: i64 = 20;

/// Classify `date` relative to the stored cycle.
///
/// The period check uses the raw offset from `start_date`, so only the
/// current cycle's period days match. The fertile and ovulation checks use
/// the offset modulo the cycle length and repeat every cycle.
pub fn classify_phase(date: NaiveDate, cycle_data: &CycleData, pregnancy_mode: bool) -> CyclePhase {
    if pregnancy_mode {
        return CyclePhase::Unknown;
    }
    let Some(start) = cycle_data.start_date else {
        return CyclePhase::Unknown;
    };

    let offset = days_between(start, date);
    if offset >= 0 && offset < cycle_data.period_length as i64 {
        return CyclePhase::Period;
    }

    let cycle_length = cycle_data.cycle_length as i64;
    let ovulation_day = cycle_length - LUTEAL_PHASE_DAYS;
    let fertile_start = ovulation_day - DAYS_BEFORE_OVULATION;
    let fertile_end = ovulation_day + DAYS_AFTER_OVULATION;

    // remainder keeps the sign of the offset
    match offset.checked_rem(cycle_length) {
        Some(day) if day == ovulation_day => CyclePhase::Ovulation,
        Some(day) if (fertile_start..=fertile_end).contains(&day) => CyclePhase::Fertile,
        _ => CyclePhase::Regular,
    }
}

/// Fertility status for the current local date.
pub fn fertility_window(cycle_data: &CycleData) -> Option<FertilityWindow> {
    fertility_window_at(cycle_data, dates::today())
}

pub fn fertility_window_at(cycle_data: &CycleData, today: NaiveDate) -> Option<FertilityWindow> {
    let start = cycle_data.start_date?;

    let next_cycle_start = add_days(start, cycle_data.cycle_length as i64);
    let ovulation_date = add_days(next_cycle_start, -LUTEAL_PHASE_DAYS);
    let fertile_window_start = add_days(ovulation_date, -DAYS_BEFORE_OVULATION);
    let fertile_window_end = add_days(ovulation_date, DAYS_AFTER_OVULATION);

    let days_until_ovulation = days_between(today, ovulation_date);
    let days_until_fertile_window = days_between(today, fertile_window_start);
    let is_ovulation_day = today == ovulation_date;
    let is_within_fertile_window = (fertile_window_start..=fertile_window_end).contains(&today);

    let fertility_percentage = if is_ovulation_day {
        100
    } else if is_within_fertile_window {
        (100 - FERTILITY_DROP_PER_DAY * days_until_ovulation.abs()).max(0) as u32
    } else {
        0
    };

    Some(FertilityWindow {
        ovulation_date,
        fertile_window_start,
        fertile_window_end,
        is_ovulation_day,
        is_within_fertile_window,
        days_until_ovulation: (days_until_ovulation > 0).then_some(days_until_ovulation),
        days_until_fertile_window: (days_until_fertile_window > 0)
            .then_some(days_until_fertile_window),
        fertility_percentage,
    })
}

/// Roll the stored cycle forward `count` times. Every forecasted cycle
/// shares the same cycle and period length.
pub fn predict_future_cycles(
    cycle_data: &CycleData,
    count: u32,
    pregnancy_mode: bool,
) -> Vec<PredictedCycle> {
    let Some(mut last_start) = cycle_data.start_date else {
        return Vec::new();
    };
    if pregnancy_mode {
        return Vec::new();
    }

    let cycle_length = cycle_data.cycle_length as i64;

    (1..=count)
        .map(|cycle_number| {
            let period_start_date = add_days(last_start, cycle_length);
            let ovulation_date = add_days(period_start_date, cycle_length - LUTEAL_PHASE_DAYS);
            last_start = period_start_date;

            PredictedCycle {
                period_start_date,
                period_end_date: period_end_date(period_start_date, cycle_data.period_length),
                ovulation_date,
                fertile_window_start: add_days(ovulation_date, -DAYS_BEFORE_OVULATION),
                fertile_window_end: add_days(ovulation_date, DAYS_AFTER_OVULATION),
                cycle_number,
            }
        })
        .collect()
}

/// Naive countdown to the next period. An overdue period wraps around by one
/// cycle length.
pub fn days_until_next_period(
    start_date: Option<NaiveDate>,
    cycle_length: u32,
    pregnancy_mode: bool,
    today: NaiveDate,
) -> Option<i64> {
    let start = start_date.filter(|_| !pregnancy_mode)?;
    let next_period = add_days(start, cycle_length as i64);
    let days = days_between(today, next_period);
    Some(if days >= 0 {
        days
    } else {
        cycle_length as i64 + days
    })
}

/// Last day of a period that starts on `start` and lasts `period_length`
/// days.
pub fn period_end_date(start: NaiveDate, period_length: u32) -> NaiveDate {
    add_days(start, period_length as i64 - 1)
}
