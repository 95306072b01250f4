//! Rotation policy configuration.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Calendar knobs for the rotation.
///
/// The engine never reads the environment; callers construct a policy (or
/// take the default) and pass it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    /// Length of one rota period in days.
    pub period_days: u32,

    /// Weekday every period start must fall on.
    pub week_start: Weekday,

    /// Days covered by the parallel weekend duty track.
    pub weekend_days: [Weekday; 2],
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            period_days: 7,
            week_start: Weekday::Mon,
            weekend_days: [Weekday::Sat, Weekday::Sun],
        }
    }
}

impl RotationPolicy {
    /// True when `day` belongs to the weekend duty track.
    pub fn is_weekend_day(&self, day: Weekday) -> bool {
        self.weekend_days.contains(&day)
    }
}
