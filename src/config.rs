// Topics, poll intervals, thresholds, preset constants
use std::time::Duration;

// Zenoh topics (relative to the key prefix)
pub const DEFAULT_KEY_PREFIX: &str = "omni";
pub const TOPIC_DIRECTIVE: &str = "directive"; // inbound directives
pub const TOPIC_EVENT: &str = "event"; // outbound events, suffixed with the event name
pub const TOPIC_SIM_PROXIMITY: &str = "sim/proximity"; // simulated proximity reading
pub const TOPIC_SIM_LOAD: &str = "sim/load"; // simulated kicker load
pub const TOPIC_STATE: &str = "state"; // mode flags

// How often the mode flags are published
pub const STATE_PUBLISH_PERIOD: Duration = Duration::from_secs(1);

// Monitor polling
pub const IDLE_POLL: Duration = Duration::from_secs(1);
pub const ACTIVE_POLL: Duration = Duration::from_millis(200);

// A monitor fires once its counter exceeds this many consecutive hits (4th sample)
pub const DEBOUNCE_LIMIT: u32 = 3;

// Proximity below this counts as closing in (sensor units)
pub const PROXIMITY_THRESHOLD: f32 = 50.0;

// Kicker load above this percentage means the ball is held
pub const LOAD_THRESHOLD: f32 = 40.0;

// Presets
pub const DEFAULT_PRESET_SPEED: i32 = 50;
pub const PRESET_LEG_SECONDS: u32 = 2;
pub const PRESET_TURN_SECONDS: u32 = 1;

// Kicker motor
pub const SHOOT_SPEED: f32 = -50.0;
pub const SHOOT_SECONDS: f32 = 0.2;
pub const TAKE_SPEED: f32 = 5.0;

// Patrol picks a duration in 1..=5 seconds and a speed from this list
pub const PATROL_MIN_SECONDS: u32 = 1;
pub const PATROL_MAX_SECONDS: u32 = 5;
pub const PATROL_SPEEDS: [i32; 4] = [25, 50, 75, 100];

// Simulated sensor readings before anything is scripted
pub const SIM_IDLE_PROXIMITY: f32 = 100.0;
pub const SIM_IDLE_LOAD: f32 = 0.0;

/// Polling and threshold settings shared by the three monitors
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub idle_poll: Duration,
    pub active_poll: Duration,
    pub debounce_limit: u32,
    pub proximity_threshold: f32,
    pub load_threshold: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            idle_poll: IDLE_POLL,
            active_poll: ACTIVE_POLL,
            debounce_limit: DEBOUNCE_LIMIT,
            proximity_threshold: PROXIMITY_THRESHOLD,
            load_threshold: LOAD_THRESHOLD,
        }
    }
}

/// Join a topic onto the configured key prefix
pub fn topic(prefix: &str, suffix: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), suffix)
}
