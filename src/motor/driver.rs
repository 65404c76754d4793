// Driver-side interfaces for the omni base
//
// The core only talks to motors and sensors through these traits; the
// concrete binding (simulated or hardware) is injected at startup.

use async_trait::async_trait;

/// Output ports on the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motor {
    Left,
    Right,
    Back,
    /// Ball handling motor used to take and shoot
    Kicker,
}

impl Motor {
    /// The three drive wheels in [left, right, back] order
    pub const WHEELS: [Motor; 3] = [Motor::Left, Motor::Right, Motor::Back];
    pub const ALL: [Motor; 4] = [Motor::Left, Motor::Right, Motor::Back, Motor::Kicker];
}

/// Maximum magnitude of a speed percentage
pub const MAX_SPEED_PERCENT: f32 = 100.0;

/// Clamp a speed percentage into the range the driver accepts
pub fn clamp_speed(speed: f32) -> f32 {
    speed.clamp(-MAX_SPEED_PERCENT, MAX_SPEED_PERCENT)
}

/// Error types reported by a driver binding
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Motor {0:?} is not connected")]
    Disconnected(Motor),

    #[error("Sensor read failed: {0}")]
    SensorRead(String),
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Motor actuation
///
/// A new command on a motor replaces whatever that motor was doing.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Run at `speed` percent for `seconds`, then stop.
    /// With `blocking` the call returns only once the run has finished.
    async fn run_for_seconds(
        &self,
        motor: Motor,
        speed: f32,
        seconds: f32,
        blocking: bool,
    ) -> Result<()>;

    /// Run at `speed` percent until told otherwise
    async fn run_continuous(&self, motor: Motor, speed: f32) -> Result<()>;

    /// Actively stop the motor
    async fn stop(&self, motor: Motor) -> Result<()>;

    /// Cut power to the motor
    async fn off(&self, motor: Motor) -> Result<()>;
}

/// Sensor readings
#[async_trait]
pub trait Sensors: Send + Sync {
    /// Distance to the nearest obstacle, in sensor units
    async fn read_proximity(&self) -> Result<f32>;

    /// Kicker motor load as a percentage
    async fn read_actuator_load(&self) -> Result<f32>;
}
