//! Blood glucose timeline projection
//!
//! Actual readings are sparse. Between them the projector estimates a
//! baseline by linear interpolation and adds the superposed impact of every
//! meal whose effect window covers the step.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use super::curve::meal_curve;
use super::types::{MealImpactCurve, ProjectionOptions, TimelinePoint, MINIMUM_SAFE_GLUCOSE};
use crate::constants::PatientConstants;
use crate::data::{GlucoseReading, GlucoseStatus, MealRecord};

/// Project blood glucose at fixed steps across meals and readings
///
/// The timeline runs from the earliest to the latest meal or reading, plus the
/// optional future horizon. An empty meal list yields an empty timeline.
/// Readings that fail validation are skipped, and estimated readings never
/// anchor the baseline.
pub fn project(
    meals: &[MealRecord],
    readings: &[GlucoseReading],
    constants: &PatientConstants,
    options: &ProjectionOptions,
) -> Vec<TimelinePoint> {
    if meals.is_empty() {
        tracing::debug!("No meals to project");
        return Vec::new();
    }

    let anchors = actual_readings(readings);
    let Some((start, end)) = bounds(meals, readings, options) else {
        return Vec::new();
    };

    let curve_options = options.curve_options();
    let curves: Vec<(&MealRecord, MealImpactCurve)> = meals
        .iter()
        .map(|meal| (meal, meal_curve(constants, &meal.nutrients, &curve_options)))
        .collect();

    let target = constants.target_glucose;
    let scaling = options.scaling_for(constants);
    let step = Duration::minutes(i64::from(curve_options.step()));
    let half_step = step / 2;

    tracing::debug!(
        meals = meals.len(),
        readings = anchors.len(),
        %start,
        %end,
        scaling,
        "Projecting glucose timeline"
    );

    let mut points = Vec::new();
    let mut t = start;
    while t <= end {
        let (meal_effects, total_meal_effect) = meal_effects_at(&curves, t);
        let estimated_blood_sugar = baseline(&anchors, t, target);

        let point = match nearest_within(&anchors, t, half_step) {
            Some(reading) => TimelinePoint {
                timestamp: t,
                estimated_blood_sugar,
                blood_sugar: reading.value,
                total_meal_effect,
                meal_effects,
                is_actual_reading: true,
                status: GlucoseStatus::classify(reading.value, target),
            },
            None => {
                let blood_sugar =
                    (estimated_blood_sugar + total_meal_effect * scaling).max(MINIMUM_SAFE_GLUCOSE);
                TimelinePoint {
                    timestamp: t,
                    estimated_blood_sugar,
                    blood_sugar,
                    total_meal_effect,
                    meal_effects,
                    is_actual_reading: false,
                    status: GlucoseStatus::classify(blood_sugar, target),
                }
            }
        };
        points.push(point);
        t += step;
    }

    points
}

/// Valid actual readings in time order
fn actual_readings(readings: &[GlucoseReading]) -> Vec<&GlucoseReading> {
    let mut anchors: Vec<&GlucoseReading> = readings
        .iter()
        .filter(|r| r.is_actual_reading)
        .filter(|r| match r.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(timestamp = %r.timestamp, error = %e, "Skipping glucose reading");
                false
            }
        })
        .collect();
    anchors.sort_by_key(|r| r.timestamp);
    anchors
}

/// Earliest and latest event, with the horizon added to the end
fn bounds(
    meals: &[MealRecord],
    readings: &[GlucoseReading],
    options: &ProjectionOptions,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let times = meals
        .iter()
        .map(|m| m.timestamp)
        .chain(readings.iter().map(|r| r.timestamp));
    let (start, end) = times.fold(None, |acc, t| match acc {
        None => Some((t, t)),
        Some((lo, hi)) => Some((t.min(lo), t.max(hi))),
    })?;

    let seconds = (options.horizon_hours() * 3600.0).round() as i64;
    let extended = Duration::try_seconds(seconds).and_then(|h| end.checked_add_signed(h));
    match extended {
        Some(extended) => Some((start, extended)),
        None => {
            tracing::warn!(%end, seconds, "Future horizon out of range, stopping at the last event");
            Some((start, end))
        }
    }
}

/// Impact of every meal at `t`, keyed by meal id, and their sum
fn meal_effects_at(
    curves: &[(&MealRecord, MealImpactCurve)],
    t: NaiveDateTime,
) -> (BTreeMap<String, f64>, f64) {
    let mut effects = BTreeMap::new();
    let mut total = 0.0;
    for (meal, curve) in curves {
        let hours = (t - meal.timestamp).num_seconds() as f64 / 3600.0;
        if hours < 0.0 || hours > curve.duration_hours {
            continue;
        }
        let effect = curve.value_at(hours);
        *effects.entry(meal.id.clone()).or_insert(0.0) += effect;
        total += effect;
    }
    (effects, total)
}

/// The reading closest to `t`, if it lies within `tolerance`
fn nearest_within<'a>(
    anchors: &[&'a GlucoseReading],
    t: NaiveDateTime,
    tolerance: Duration,
) -> Option<&'a GlucoseReading> {
    anchors
        .iter()
        .map(|r| (*r, (r.timestamp - t).abs()))
        .filter(|(_, gap)| *gap <= tolerance)
        .min_by_key(|(_, gap)| *gap)
        .map(|(r, _)| r)
}

/// Baseline glucose at `t` from the surrounding actual readings
///
/// Interpolates linearly between the nearest readings on each side, falls
/// back to the only side available, and to `target` without readings.
fn baseline(anchors: &[&GlucoseReading], t: NaiveDateTime, target: f64) -> f64 {
    let before = anchors.iter().rev().find(|r| r.timestamp <= t);
    let after = anchors.iter().find(|r| r.timestamp >= t);

    match (before, after) {
        (Some(a), Some(b)) => {
            let span = (b.timestamp - a.timestamp).num_seconds();
            if span == 0 {
                return a.value;
            }
            let elapsed = (t - a.timestamp).num_seconds() as f64;
            a.value + (b.value - a.value) * elapsed / span as f64
        }
        (Some(only), None) | (None, Some(only)) => only.value,
        (None, None) => target,
    }
}
