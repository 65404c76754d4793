// Random wandering while patrol mode is on

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info};

use super::pause;
use crate::config::{MonitorConfig, PATROL_MAX_SECONDS, PATROL_MIN_SECONDS, PATROL_SPEEDS};
use crate::motor::{MotionEngine, MoveRequest};
use crate::state::RobotState;
use crate::symbols::Direction;

/// Every direction except Stop
const PATROL_DIRECTIONS: [Direction; 10] = [
    Direction::Forward,
    Direction::Backward,
    Direction::Left,
    Direction::Right,
    Direction::ForwardLeft,
    Direction::ForwardRight,
    Direction::BackwardLeft,
    Direction::BackwardRight,
    Direction::RotateLeft,
    Direction::RotateRight,
];

/// One randomly chosen stretch of patrol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolLeg {
    pub direction: Direction,
    pub duration_secs: u32,
    pub speed_percent: i32,
}

impl PatrolLeg {
    /// The leg as a move request
    ///
    /// Legs are issued by spoken token, so rotation picks read as the
    /// matching strafe in move context.
    pub fn to_request(self) -> MoveRequest {
        let direction =
            Direction::resolve_move(self.direction.canonical_token()).unwrap_or(self.direction);
        MoveRequest::new(direction, self.duration_secs, self.speed_percent)
    }
}

/// Pick a direction (never Stop), a duration and a speed uniformly at random
pub fn pick_leg<R: Rng + ?Sized>(rng: &mut R) -> PatrolLeg {
    PatrolLeg {
        direction: PATROL_DIRECTIONS[rng.gen_range(0..PATROL_DIRECTIONS.len())],
        duration_secs: rng.gen_range(PATROL_MIN_SECONDS..=PATROL_MAX_SECONDS),
        speed_percent: PATROL_SPEEDS[rng.gen_range(0..PATROL_SPEEDS.len())],
    }
}

pub struct PatrolMonitor {
    engine: Arc<MotionEngine>,
    state: Arc<RobotState>,
    config: MonitorConfig,
    rng: StdRng,
}

impl PatrolMonitor {
    pub fn new(engine: Arc<MotionEngine>, state: Arc<RobotState>, config: MonitorConfig) -> Self {
        Self::with_rng(engine, state, config, StdRng::from_entropy())
    }

    pub fn with_rng(
        engine: Arc<MotionEngine>,
        state: Arc<RobotState>,
        config: MonitorConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            engine,
            state,
            config,
            rng,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        debug!("Patrol monitor running");
        loop {
            // The flag is only checked between legs, a leg always runs its full time
            while self.state.patrol_mode() {
                let leg = pick_leg(&mut self.rng);
                info!(
                    "Patrol leg: {:?} for {}s at {}%",
                    leg.direction, leg.duration_secs, leg.speed_percent
                );
                self.engine.move_base(leg.to_request()).await;

                let leg_time = Duration::from_secs(u64::from(leg.duration_secs));
                if !pause(&mut shutdown, leg_time).await {
                    return;
                }
            }
            if !pause(&mut shutdown, self.config.idle_poll).await {
                return;
            }
        }
    }
}
