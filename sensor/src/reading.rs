use rand::Rng;
use serde::Serialize;

const MOTION_THRESHOLD: f64 = 2.0;
const ALERT_THRESHOLD: f64 = 10.0;
const AVG_SMOOTHING: f64 = 0.2;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub human_presence: String,
    pub motion: String,
    pub move_range: f64,
    pub avg_move_range: f64,
    pub alert_active: bool,
}

/// Synthesizes a plausible presence signal: occupancy is sticky, movement
/// magnitude depends on it, and the average is an exponential smoothing of
/// the instantaneous values.
#[derive(Debug)]
pub struct PresenceSimulator {
    present: bool,
    avg_move_range: f64,
}

impl PresenceSimulator {
    pub fn new() -> Self {
        Self {
            present: false,
            avg_move_range: 0.0,
        }
    }

    pub fn next_reading(&mut self, rng: &mut impl Rng) -> NewReading {
        // Occupancy flips rarely so runs of Detected/Not Detected look real
        if rng.gen_bool(0.08) {
            self.present = !self.present;
        }

        let move_range = if self.present {
            rng.gen_range(0.5..15.0)
        } else {
            rng.gen_range(0.0..0.8)
        };

        self.avg_move_range =
            (1.0 - AVG_SMOOTHING) * self.avg_move_range + AVG_SMOOTHING * move_range;

        let motion = if move_range > MOTION_THRESHOLD {
            "Moving"
        } else {
            "Still"
        };

        NewReading {
            human_presence: if self.present {
                "Detected".to_string()
            } else {
                "Not Detected".to_string()
            },
            motion: motion.to_string(),
            move_range,
            avg_move_range: self.avg_move_range,
            alert_active: self.present && move_range > ALERT_THRESHOLD,
        }
    }
}
