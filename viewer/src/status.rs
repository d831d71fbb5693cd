use crate::model::Reading;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Detected,
    NotDetected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    Active,
    Normal,
}

/// The three indicators derived from the latest reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicators {
    pub presence: PresenceStatus,
    pub motion: String,
    pub alert: AlertStatus,
}

impl StatusIndicators {
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            presence: if reading.human_presence == "Detected" {
                PresenceStatus::Detected
            } else {
                PresenceStatus::NotDetected
            },
            motion: if reading.motion.trim().is_empty() {
                "Unknown".to_string()
            } else {
                reading.motion.clone()
            },
            alert: if reading.alert_active {
                AlertStatus::Active
            } else {
                AlertStatus::Normal
            },
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceStatus::Detected => write!(f, "Detected"),
            PresenceStatus::NotDetected => write!(f, "Not Detected"),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Active => write!(f, "Active"),
            AlertStatus::Normal => write!(f, "Normal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn reading(presence: &str, motion: &str, alert: bool) -> Reading {
        Reading {
            id: Uuid::new_v4(),
            human_presence: presence.to_string(),
            motion: motion.to_string(),
            move_range: 5.0,
            avg_move_range: 4.0,
            alert_active: alert,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_detected_on_exact_match() {
        let s = StatusIndicators::from_reading(&reading("Detected", "Moving", false));
        assert_eq!(s.presence, PresenceStatus::Detected);
    }

    #[test]
    fn test_any_other_presence_string_is_not_detected() {
        for value in ["Not Detected", "detected", "yes", ""] {
            let s = StatusIndicators::from_reading(&reading(value, "Still", false));
            assert_eq!(s.presence, PresenceStatus::NotDetected);
        }
    }

    #[test]
    fn test_blank_motion_becomes_unknown() {
        let s = StatusIndicators::from_reading(&reading("Detected", "  ", false));
        assert_eq!(s.motion, "Unknown");

        let s = StatusIndicators::from_reading(&reading("Detected", "Still", false));
        assert_eq!(s.motion, "Still");
    }

    #[test]
    fn test_alert_flag_maps_to_status() {
        let active = StatusIndicators::from_reading(&reading("Detected", "Moving", true));
        assert_eq!(active.alert, AlertStatus::Active);

        let normal = StatusIndicators::from_reading(&reading("Detected", "Moving", false));
        assert_eq!(normal.alert, AlertStatus::Normal);
    }
}
