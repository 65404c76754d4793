// Named presets built from primitive moves and mode transitions

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{
    PRESET_LEG_SECONDS, PRESET_TURN_SECONDS, SHOOT_SECONDS, SHOOT_SPEED, TAKE_SPEED,
};
use crate::events::{Event, EventSink};
use crate::motor::{MotionEngine, Motor, MoveRequest};
use crate::state::RobotState;
use crate::symbols::{Command, Direction};

/// Legs of the circle preset, each issued without waiting on the last
const CIRCLE_LEGS: [Direction; 4] = [
    Direction::Right,
    Direction::Forward,
    Direction::Left,
    Direction::Backward,
];

const SQUARE_SIDES: usize = 4;

pub struct PresetComposer {
    engine: Arc<MotionEngine>,
    state: Arc<RobotState>,
    events: Arc<dyn EventSink>,
}

impl PresetComposer {
    pub fn new(
        engine: Arc<MotionEngine>,
        state: Arc<RobotState>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            engine,
            state,
            events,
        }
    }

    pub async fn activate(&self, command: Command, speed: i32) {
        info!("Activate: {:?} at {}%", command, speed);
        match command {
            Command::MoveCircle => {
                for direction in CIRCLE_LEGS {
                    self.engine
                        .move_base(MoveRequest::new(direction, PRESET_LEG_SECONDS, speed))
                        .await;
                }
            }
            Command::MoveSquare => {
                for _ in 0..SQUARE_SIDES {
                    self.engine
                        .move_base(MoveRequest::new(Direction::Forward, PRESET_LEG_SECONDS, speed))
                        .await;
                    self.engine
                        .turn(MoveRequest::new(Direction::Left, PRESET_TURN_SECONDS, speed))
                        .await;
                }
            }
            Command::Patrol => {
                // Motion comes from the patrol monitor
                self.state.set_patrol_mode(true);
            }
            Command::Shoot => self.shoot().await,
            Command::Take => self.take().await,
        }
    }

    async fn shoot(&self) {
        let scoring = self.state.ready_to_score();

        if let Err(e) = self
            .engine
            .actuator()
            .run_for_seconds(Motor::Kicker, SHOOT_SPEED, SHOOT_SECONDS, true)
            .await
        {
            warn!("Kick failed: {}", e);
        }

        if scoring {
            info!("Shot while closing in, scoring");
            self.events.emit(Event::score());
        }
        self.state.clear_scoring();
    }

    async fn take(&self) {
        if let Err(e) = self
            .engine
            .actuator()
            .run_continuous(Motor::Kicker, TAKE_SPEED)
            .await
        {
            warn!("Failed to start kicker: {}", e);
        }
        self.state.set_taking_mode(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventName;
    use crate::motor::sim::{ActuationCall, SimulatedBase};
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    struct Harness {
        presets: PresetComposer,
        sim: SimulatedBase,
        state: Arc<RobotState>,
        events: UnboundedReceiver<Event>,
    }

    fn harness() -> Harness {
        let sim = SimulatedBase::new();
        let state = Arc::new(RobotState::new());
        let engine = Arc::new(MotionEngine::new(Arc::new(sim.clone()), Arc::clone(&state)));
        let (tx, events) = unbounded_channel();
        let presets = PresetComposer::new(engine, Arc::clone(&state), Arc::new(tx));
        Harness {
            presets,
            sim,
            state,
            events,
        }
    }

    fn left_wheel_calls(sim: &SimulatedBase) -> Vec<(f32, f32)> {
        sim.calls()
            .into_iter()
            .filter_map(|call| match call {
                ActuationCall::RunForSeconds {
                    motor: Motor::Left,
                    speed,
                    seconds,
                    ..
                } => Some((speed, seconds)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_square_alternates_forward_and_turn() {
        let h = harness();
        h.presets.activate(Command::MoveSquare, 40).await;

        // Forward drives the left wheel at +s, a left turn at +s/5
        let expected: Vec<(f32, f32)> = (0..4).flat_map(|_| [(40.0, 2.0), (8.0, 1.0)]).collect();
        assert_eq!(left_wheel_calls(&h.sim), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_circle_issues_four_legs_last_one_wins() {
        let h = harness();
        h.presets.activate(Command::MoveCircle, 50).await;

        assert_eq!(
            left_wheel_calls(&h.sim),
            vec![(-25.0, 2.0), (50.0, 2.0), (25.0, 2.0), (-50.0, 2.0)]
        );
        assert_eq!(h.sim.speed(Motor::Left), -50.0);
        assert_eq!(h.sim.speed(Motor::Right), 50.0);
        // Backward leaves the back wheel on the left leg's command
        assert_eq!(h.sim.speed(Motor::Back), -50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_patrol_only_sets_flag() {
        let h = harness();
        h.presets.activate(Command::Patrol, 50).await;
        assert!(h.state.patrol_mode());
        assert!(h.sim.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shoot_scores_when_closing() {
        let mut h = harness();
        h.state.set_scoring_mode(true);
        h.state.set_closing(true);

        h.presets.activate(Command::Shoot, 50).await;

        let event = h.events.try_recv().unwrap();
        assert_eq!(event.name, EventName::Score);
        assert!(h.events.try_recv().is_err());
        assert!(!h.state.scoring_mode());
        assert!(!h.state.closing());
        assert_eq!(
            h.sim.calls(),
            vec![ActuationCall::RunForSeconds {
                motor: Motor::Kicker,
                speed: SHOOT_SPEED,
                seconds: SHOOT_SECONDS,
                blocking: true,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shoot_without_closing_is_silent_and_still_clears() {
        let mut h = harness();
        h.state.set_scoring_mode(true);

        h.presets.activate(Command::Shoot, 50).await;
        assert!(h.events.try_recv().is_err());
        assert!(!h.state.scoring_mode());

        // Idempotent
        h.presets.activate(Command::Shoot, 50).await;
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_starts_kicker_and_enters_taking() {
        let h = harness();
        h.presets.activate(Command::Take, 50).await;

        assert!(h.state.taking_mode());
        assert_eq!(h.sim.speed(Motor::Kicker), TAKE_SPEED);
    }
}
