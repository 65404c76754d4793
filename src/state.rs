// Mode flags shared by the dispatch path and the monitors
//
// The lock is only ever held for a flag read or write, never across an
// await point.

use parking_lot::Mutex;
use serde::Serialize;

/// Snapshot of the robot's mode flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeFlags {
    pub patrol_mode: bool,
    pub scoring_mode: bool,
    pub taking_mode: bool,
    /// Only meaningful while scoring_mode is set
    pub closing: bool,
}

/// Shared, synchronized robot state
#[derive(Debug, Default)]
pub struct RobotState {
    flags: Mutex<ModeFlags>,
}

impl RobotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ModeFlags {
        *self.flags.lock()
    }

    pub fn patrol_mode(&self) -> bool {
        self.flags.lock().patrol_mode
    }

    pub fn set_patrol_mode(&self, on: bool) {
        self.flags.lock().patrol_mode = on;
    }

    pub fn scoring_mode(&self) -> bool {
        self.flags.lock().scoring_mode
    }

    pub fn set_scoring_mode(&self, on: bool) {
        self.flags.lock().scoring_mode = on;
    }

    pub fn taking_mode(&self) -> bool {
        self.flags.lock().taking_mode
    }

    pub fn set_taking_mode(&self, on: bool) {
        self.flags.lock().taking_mode = on;
    }

    pub fn closing(&self) -> bool {
        self.flags.lock().closing
    }

    pub fn set_closing(&self, on: bool) {
        self.flags.lock().closing = on;
    }

    /// True when a shot now would score (scoring and closing in)
    pub fn ready_to_score(&self) -> bool {
        let flags = self.flags.lock();
        flags.scoring_mode && flags.closing
    }

    /// Leave scoring after a shot
    pub fn clear_scoring(&self) {
        let mut flags = self.flags.lock();
        flags.scoring_mode = false;
        flags.closing = false;
    }

    /// Ball secured: stop taking and hand over to scoring
    pub fn ball_taken(&self) {
        let mut flags = self.flags.lock();
        flags.taking_mode = false;
        flags.scoring_mode = true;
    }
}
