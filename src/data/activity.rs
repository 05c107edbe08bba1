use serde::{Deserialize, Deserializer, Serialize};

/// Hours of activity after which its impact on the dose saturates
pub const ACTIVITY_SATURATION_HOURS: f64 = 2.0;

/// A physical activity around a meal
///
/// `level` ranges from -2 (sleep) to +2 (vigorous). Duration is in hours and
/// may be given on the wire as a number or as an `"HH:MM"` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub level: i32,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: f64,
    /// Impact recorded alongside the activity by the logging surface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
}

impl Activity {
    pub fn new(level: i32, duration: f64) -> Self {
        Activity {
            level,
            duration,
            impact: None,
        }
    }

    /// Fraction of the full impact this activity carries, `min(duration / 2h, 1)`
    ///
    /// Negative and non-finite durations carry no weight.
    pub fn duration_weight(&self) -> f64 {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return 0.0;
        }
        (self.duration / ACTIVITY_SATURATION_HOURS).min(1.0)
    }
}

/// Parse an `"HH:MM"` duration into hours
pub fn parse_duration(s: &str) -> Option<f64> {
    let (hours, minutes) = s.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(hours as f64 + minutes as f64 / 60.0)
}

/// Format hours as an `"HH:MM"` duration
pub fn format_duration(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as u64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Hours(f64),
    Text(String),
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    Ok(match raw {
        None => 0.0,
        Some(RawDuration::Hours(h)) => h,
        Some(RawDuration::Text(s)) => s
            .parse::<f64>()
            .ok()
            .or_else(|| parse_duration(&s))
            .unwrap_or_else(|| {
                tracing::warn!(duration = %s, "Unparseable activity duration, using 0 hours");
                0.0
            }),
    })
}
