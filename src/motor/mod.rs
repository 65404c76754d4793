// Motor control for the three-wheel omni base
//
// Provides:
// - Symbolic wheel kinematics (direction -> per-wheel speed fractions)
// - Actuator and sensor traits implemented by driver bindings
// - A simulated driver
// - The motion engine turning move/turn requests into actuation calls

mod driver;
mod engine;
pub mod kinematics;
pub mod sim;

pub use driver::{Actuator, DriverError, MAX_SPEED_PERCENT, Motor, Sensors, clamp_speed};
pub use engine::{MotionEngine, MoveRequest};
pub use kinematics::{KinematicsError, WheelSpeeds, coefficients_for, turn_coefficients_for};
pub use sim::{ActuationCall, SimulatedBase};
