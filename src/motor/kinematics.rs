// Symbolic kinematics for the three-wheel omni base
// Maps a direction to signed per-wheel fractions of the requested speed.

use crate::symbols::Direction;

/// Rotation in place spins every wheel at this fraction of the requested speed
const TURN_FRACTION: f32 = 0.2;

/// Error returned when a direction has no entry in the table
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    #[error("No wheel coefficients for direction {0:?}")]
    UnknownDirection(Direction),
}

/// Per-wheel values, either coefficients in [-1, 1] or speed percentages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelSpeeds {
    pub left: f32,
    pub right: f32,
    pub back: f32,
}

impl WheelSpeeds {
    pub const fn new(left: f32, right: f32, back: f32) -> Self {
        Self { left, right, back }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Multiply coefficients by a speed percentage
    pub fn scaled(&self, speed: f32) -> Self {
        Self {
            left: self.left * speed,
            right: self.right * speed,
            back: self.back * speed,
        }
    }

    /// Returns values as array [left, right, back]
    pub fn as_array(&self) -> [f32; 3] {
        [self.left, self.right, self.back]
    }
}

/// Translation coefficients (left, right, back) for a direction
///
/// Stop maps to all zeros; rotations have no translation entry.
pub fn coefficients_for(direction: Direction) -> Result<WheelSpeeds, KinematicsError> {
    let coefficients = match direction {
        Direction::Forward => WheelSpeeds::new(1.0, -1.0, 0.0),
        Direction::Backward => WheelSpeeds::new(-1.0, 1.0, 0.0),
        Direction::Right => WheelSpeeds::new(-0.5, -0.5, 1.0),
        Direction::Left => WheelSpeeds::new(0.5, 0.5, -1.0),
        Direction::ForwardRight => WheelSpeeds::new(0.25, -1.0, 0.5),
        Direction::BackwardRight => WheelSpeeds::new(-1.0, 0.25, 0.5),
        Direction::ForwardLeft => WheelSpeeds::new(1.0, -0.25, -0.5),
        Direction::BackwardLeft => WheelSpeeds::new(-0.25, 1.0, -0.5),
        Direction::Stop => WheelSpeeds::zero(),
        Direction::RotateLeft | Direction::RotateRight => {
            return Err(KinematicsError::UnknownDirection(direction));
        }
    };
    Ok(coefficients)
}

/// Rotation coefficients; all wheels share a sign so the chassis spins in place
///
/// Accepts the strafing symbols too, since "left"/"right" double as turn words.
pub fn turn_coefficients_for(direction: Direction) -> Result<WheelSpeeds, KinematicsError> {
    match direction {
        Direction::Left | Direction::RotateLeft => Ok(WheelSpeeds::new(
            TURN_FRACTION,
            TURN_FRACTION,
            TURN_FRACTION,
        )),
        Direction::Right | Direction::RotateRight => Ok(WheelSpeeds::new(
            -TURN_FRACTION,
            -TURN_FRACTION,
            -TURN_FRACTION,
        )),
        other => Err(KinematicsError::UnknownDirection(other)),
    }
}
