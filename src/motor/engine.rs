// Direction requests -> per-wheel actuation calls

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::driver::{Actuator, Motor, clamp_speed};
use super::kinematics::{WheelSpeeds, coefficients_for, turn_coefficients_for};
use crate::state::RobotState;
use crate::symbols::Direction;

/// A single timed motion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    pub direction: Direction,
    pub duration_secs: u32,
    pub speed_percent: i32,
    pub blocking: bool,
}

impl MoveRequest {
    /// Non-blocking request, the default for directives and presets
    pub fn new(direction: Direction, duration_secs: u32, speed_percent: i32) -> Self {
        Self {
            direction,
            duration_secs,
            speed_percent,
            blocking: false,
        }
    }

    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }
}

/// Drives the three wheels from symbolic requests
pub struct MotionEngine {
    actuator: Arc<dyn Actuator>,
    state: Arc<RobotState>,
}

impl MotionEngine {
    pub fn new(actuator: Arc<dyn Actuator>, state: Arc<RobotState>) -> Self {
        Self { actuator, state }
    }

    pub fn actuator(&self) -> &Arc<dyn Actuator> {
        &self.actuator
    }

    /// Translate in a direction, or halt everything on Stop
    ///
    /// Directions without a translation entry are ignored.
    pub async fn move_base(&self, request: MoveRequest) {
        info!(
            "Move: {:?} for {}s at {}% (blocking={})",
            request.direction, request.duration_secs, request.speed_percent, request.blocking
        );

        if request.direction == Direction::Stop {
            self.halt().await;
            return;
        }

        match coefficients_for(request.direction) {
            Ok(coefficients) => self.actuate(coefficients, &request).await,
            Err(e) => debug!("Ignoring move: {}", e),
        }
    }

    /// Rotate in place; only left/right turns do anything
    pub async fn turn(&self, request: MoveRequest) {
        info!(
            "Turn: {:?} for {}s at {}% (blocking={})",
            request.direction, request.duration_secs, request.speed_percent, request.blocking
        );

        match turn_coefficients_for(request.direction) {
            Ok(coefficients) => self.actuate(coefficients, &request).await,
            Err(e) => debug!("Ignoring turn: {}", e),
        }
    }

    /// Power off all wheels and leave patrol mode
    pub async fn halt(&self) {
        info!("Stopping all wheels");
        for motor in Motor::WHEELS {
            if let Err(e) = self.actuator.off(motor).await {
                warn!("Failed to turn off {:?}: {}", motor, e);
            }
        }
        self.state.set_patrol_mode(false);
    }

    async fn actuate(&self, coefficients: WheelSpeeds, request: &MoveRequest) {
        let speed = request.speed_percent as f32;
        let seconds = request.duration_secs as f32;

        // Wheels with a zero coefficient are left alone
        let wheels: Vec<(Motor, f32)> = Motor::WHEELS
            .into_iter()
            .zip(coefficients.as_array())
            .filter(|&(_, coefficient)| coefficient != 0.0)
            .map(|(motor, coefficient)| (motor, coefficient * speed))
            .collect();

        // Wheels start together; a blocking request waits on the last one only
        let last = wheels.len().saturating_sub(1);
        for (i, (motor, speed)) in wheels.into_iter().enumerate() {
            let blocking = request.blocking && i == last;
            if let Err(e) = self
                .actuator
                .run_for_seconds(motor, clamp_speed(speed), seconds, blocking)
                .await
            {
                warn!("Failed to drive {:?}: {}", motor, e);
            }
        }
    }
}
