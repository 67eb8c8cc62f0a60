//! Illustrative lifetime totals derived from elapsed days.
//!
//! These are the fun "your baby's heart has beaten N times" numbers, not
//! medical claims. The per-day rates are age-banded constants; the bands
//! and their values are part of the observable contract and are tested
//! against literal inputs.

use serde::{Deserialize, Serialize};

/// Cumulative estimates since birth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeEstimates {
    pub heartbeats: u64,
    pub breaths: u64,
    pub diapers: u64,
    pub sleep_hours: u64,
}

impl LifetimeEstimates {
    pub fn to_dto(&self) -> shared::LifetimeEstimatesDto {
        shared::LifetimeEstimatesDto {
            heartbeats: self.heartbeats,
            breaths: self.breaths,
            diapers: self.diapers,
            sleep_hours: self.sleep_hours,
        }
    }
}

/// Resting heart rate in beats per minute for an age band
fn heart_rate_bpm(age_months: i32) -> f64 {
    match age_months {
        i32::MIN..=0 => 140.0,
        1..=5 => 130.0,
        _ => 120.0,
    }
}

/// Breathing rate in breaths per minute for an age band
fn breath_rate_per_min(age_months: i32) -> f64 {
    match age_months {
        i32::MIN..=0 => 40.0,
        1..=5 => 35.0,
        _ => 30.0,
    }
}

/// Diaper changes per day for an age band
fn diapers_per_day(age_months: i32) -> f64 {
    match age_months {
        i32::MIN..=0 => 10.0,
        1..=5 => 8.0,
        6..=11 => 6.0,
        _ => 5.0,
    }
}

/// Sleep hours per day for an age band
fn sleep_hours_per_day(age_months: i32) -> f64 {
    match age_months {
        i32::MIN..=0 => 16.0,
        1..=5 => 14.0,
        6..=11 => 13.0,
        _ => 12.0,
    }
}

/// Derive cumulative estimates from elapsed days and the current age band.
///
/// `age_months` selects one rate band for the whole span; the app shows
/// these as "about" values, so per-band integration is not attempted.
/// Negative `total_days` (unborn) clamps to zero output.
pub fn estimate_aggregates(total_days: i64, age_months: i32) -> LifetimeEstimates {
    let days = total_days.max(0) as f64;

    let heartbeats = (days * 24.0 * 60.0 * heart_rate_bpm(age_months)).round() as u64;
    let breaths = (days * 24.0 * 60.0 * breath_rate_per_min(age_months)).round() as u64;
    let diapers = (days * diapers_per_day(age_months)).round() as u64;
    let sleep_hours = (days * sleep_hours_per_day(age_months)).round() as u64;

    LifetimeEstimates {
        heartbeats,
        breaths,
        diapers,
        sleep_hours,
    }
}
