//! Medication pharmacodynamic phase model
//!
//! Each active medication contributes a multiplicative factor to the medical
//! adjustment. For duration-based medications that factor follows the time
//! since the most recent scheduled dose:
//!
//! ```text
//! factor
//!   f ┤        ┌──────────┐
//!     │       ╱            ╲
//!     │      ╱              ╲
//!   1 ┼─────┘                └──────
//!     0   onset          peak    duration   hours since dose
//! ```

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{MedicationFactor, MedicationSchedule};

/// Guard for divisions by the ramp and taper lengths
const MIN_PHASE_HOURS: f64 = 1e-9;

/// Where a medication is in its effect cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationPhase {
    /// Before the schedule's start date
    NotStarted,
    /// After the schedule's end date
    Ended,
    /// Effect rising linearly towards the full factor
    RampingUp,
    /// Full effect
    Peak,
    /// Effect decaying linearly back to neutral
    Tapering,
    /// Last dose has worn off
    NoEffect,
    /// Not duration based; full effect whenever active
    ConstantEffect,
}

impl fmt::Display for MedicationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MedicationPhase::NotStarted => "not_started",
            MedicationPhase::Ended => "ended",
            MedicationPhase::RampingUp => "ramping_up",
            MedicationPhase::Peak => "peak",
            MedicationPhase::Tapering => "tapering",
            MedicationPhase::NoEffect => "no_effect",
            MedicationPhase::ConstantEffect => "constant_effect",
        };
        f.write_str(s)
    }
}

/// A medication's effect at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedicationState {
    pub phase: MedicationPhase,
    /// Current multiplicative factor (1.0 is neutral)
    pub factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_since_last_dose: Option<f64>,
}

impl MedicationState {
    fn neutral(phase: MedicationPhase) -> Self {
        MedicationState {
            phase,
            factor: 1.0,
            hours_since_last_dose: None,
        }
    }
}

/// Evaluate a medication's phase and current factor at `now`
///
/// Medications that are not duration based apply their factor whenever they
/// are active, regardless of schedule. A duration-based medication without a
/// schedule is treated the same way, since no dose times are known.
pub fn evaluate(
    profile: &MedicationFactor,
    schedule: Option<&MedicationSchedule>,
    now: NaiveDateTime,
) -> MedicationState {
    if !profile.duration_based {
        return MedicationState {
            phase: MedicationPhase::ConstantEffect,
            factor: profile.factor,
            hours_since_last_dose: None,
        };
    }

    let Some(schedule) = schedule else {
        tracing::debug!("Duration-based medication has no schedule, applying constant effect");
        return MedicationState {
            phase: MedicationPhase::ConstantEffect,
            factor: profile.factor,
            hours_since_last_dose: None,
        };
    };

    if now < schedule.start_date {
        return MedicationState::neutral(MedicationPhase::NotStarted);
    }
    if now > schedule.end_date {
        return MedicationState::neutral(MedicationPhase::Ended);
    }

    let Some(last_dose) = last_dose_before(schedule, now) else {
        tracing::warn!("Medication schedule has no valid daily times, assuming no effect");
        return MedicationState::neutral(MedicationPhase::NoEffect);
    };

    let hours = (now - last_dose).num_seconds() as f64 / 3600.0;
    let (phase, factor) = phase_at(profile, hours);

    MedicationState {
        phase,
        factor,
        hours_since_last_dose: Some(hours),
    }
}

/// Phase and factor `hours` after a dose of a duration-based medication
pub fn phase_at(profile: &MedicationFactor, hours: f64) -> (MedicationPhase, f64) {
    let full = profile.factor;
    if hours < profile.onset_hours {
        let progress = hours / profile.onset_hours.max(MIN_PHASE_HOURS);
        (MedicationPhase::RampingUp, 1.0 + (full - 1.0) * progress)
    } else if hours < profile.peak_hours {
        (MedicationPhase::Peak, full)
    } else if hours < profile.duration_hours {
        let remaining = (profile.duration_hours - hours)
            / (profile.duration_hours - profile.peak_hours).max(MIN_PHASE_HOURS);
        (MedicationPhase::Tapering, 1.0 + (full - 1.0) * remaining)
    } else {
        (MedicationPhase::NoEffect, 1.0)
    }
}

/// The most recent scheduled dose at or before `now`
///
/// Searches today's dose times first and wraps to yesterday's last dose when
/// every time today is still ahead.
pub fn last_dose_before(schedule: &MedicationSchedule, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let times = schedule.dose_times();
    let today = now.date();

    if let Some(t) = times.iter().rev().find(|t| today.and_time(**t) <= now) {
        return Some(today.and_time(*t));
    }

    let yesterday = today - Duration::days(1);
    times.last().map(|t| yesterday.and_time(*t))
}
