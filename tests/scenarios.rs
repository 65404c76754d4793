// End-to-end scenarios: directive payloads in, actuation and events out

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use omni_kicker_runtime::config::MonitorConfig;
use omni_kicker_runtime::events::{Event, EventName, EventSink};
use omni_kicker_runtime::messages::DirectiveError;
use omni_kicker_runtime::monitor::Monitors;
use omni_kicker_runtime::motor::{
    ActuationCall, Actuator, MotionEngine, Motor, MoveRequest, SimulatedBase,
};
use omni_kicker_runtime::presets::PresetComposer;
use omni_kicker_runtime::router::CommandRouter;
use omni_kicker_runtime::state::{ModeFlags, RobotState};
use omni_kicker_runtime::symbols::Direction;

struct Robot {
    router: CommandRouter,
    engine: Arc<MotionEngine>,
    sim: SimulatedBase,
    state: Arc<RobotState>,
    events: UnboundedReceiver<Event>,
    sink: Arc<dyn EventSink>,
}

fn robot() -> Robot {
    let sim = SimulatedBase::new();
    let state = Arc::new(RobotState::new());
    let engine = Arc::new(MotionEngine::new(Arc::new(sim.clone()), Arc::clone(&state)));
    let (tx, events) = unbounded_channel();
    let sink: Arc<dyn EventSink> = Arc::new(tx);
    let presets = PresetComposer::new(Arc::clone(&engine), Arc::clone(&state), Arc::clone(&sink));
    let router = CommandRouter::new(Arc::clone(&engine), presets);
    Robot {
        router,
        engine,
        sim,
        state,
        events,
        sink,
    }
}

impl Robot {
    fn spawn_monitors(&self) -> Monitors {
        let actuator: Arc<dyn Actuator> = Arc::new(self.sim.clone());
        Monitors::spawn(
            Arc::clone(&self.engine),
            actuator,
            Arc::new(self.sim.clone()),
            Arc::clone(&self.state),
            Arc::clone(&self.sink),
            MonitorConfig::default(),
        )
    }
}

#[tokio::test(start_paused = true)]
async fn move_forward_directive_drives_left_and_right() {
    let robot = robot();
    robot
        .router
        .handle_payload(br#"{"type":"move","direction":"forward","duration":2,"speed":50}"#)
        .await
        .unwrap();

    assert_eq!(robot.sim.speed(Motor::Left), 50.0);
    assert_eq!(robot.sim.speed(Motor::Right), -50.0);
    assert!(robot.sim.calls().iter().all(|c| c.motor() != Motor::Back));

    // Timed run ends on its own
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(robot.sim.speed(Motor::Left), 0.0);
}

#[tokio::test(start_paused = true)]
async fn malformed_directive_changes_nothing() {
    let robot = robot();
    robot.state.set_patrol_mode(true);
    let before = robot.state.snapshot();

    let result = robot
        .router
        .handle_payload(br#"{"type":"move","direction":"forward"}"#)
        .await;

    assert!(matches!(result, Err(DirectiveError::MissingField("duration"))));
    assert!(robot.sim.calls().is_empty());
    assert_eq!(robot.state.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn shoot_while_closing_scores_once() {
    let mut robot = robot();
    robot.state.set_scoring_mode(true);
    robot.state.set_closing(true);

    robot
        .router
        .handle_payload(br#"{"type":"command","command":"shoot"}"#)
        .await
        .unwrap();

    assert_eq!(robot.events.try_recv().unwrap(), Event::score());
    assert!(robot.events.try_recv().is_err());
    assert_eq!(robot.state.snapshot(), ModeFlags::default());
}

#[tokio::test(start_paused = true)]
async fn stop_always_halts_and_ends_patrol() {
    let robot = robot();
    for direction in [Direction::Forward, Direction::BackwardLeft, Direction::Stop] {
        robot.state.set_patrol_mode(true);
        robot.engine.move_base(MoveRequest::new(direction, 3, 75)).await;
        robot.engine.move_base(MoveRequest::new(Direction::Stop, 0, 0)).await;

        for motor in Motor::WHEELS {
            assert_eq!(robot.sim.speed(motor), 0.0);
        }
        assert!(!robot.state.patrol_mode());
    }
}

#[tokio::test(start_paused = true)]
async fn take_then_possession_hands_over_to_scoring() {
    let mut robot = robot();
    let monitors = robot.spawn_monitors();

    robot
        .router
        .handle_payload(br#"{"type":"command","command":"take"}"#)
        .await
        .unwrap();
    assert!(robot.state.taking_mode());
    assert!(robot.sim.speed(Motor::Kicker) > 0.0);

    robot.sim.script_load([45.0, 45.0, 45.0, 45.0]);
    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert_eq!(robot.events.try_recv().unwrap().name, EventName::Taking);
    assert_eq!(robot.sim.speed(Motor::Kicker), 0.0);
    assert!(robot.sim.calls().contains(&ActuationCall::Stop(Motor::Kicker)));
    let flags = robot.state.snapshot();
    assert!(!flags.taking_mode);
    assert!(flags.scoring_mode);

    monitors.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn full_play_take_close_in_and_score() {
    let mut robot = robot();
    let monitors = robot.spawn_monitors();

    robot
        .router
        .handle_payload(br#"{"type":"command","command":"take"}"#)
        .await
        .unwrap();
    robot.sim.set_load(80.0);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(robot.events.try_recv().unwrap().name, EventName::Taking);

    // Scoring now; an obstacle appears
    robot.sim.set_load(0.0);
    robot.sim.set_proximity(20.0);
    // Long enough for one confirmation, short of the next idle re-entry
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let closing = robot.events.try_recv().unwrap();
    assert_eq!(closing.name, EventName::Closing);
    assert!(robot.state.closing());

    robot.sim.set_proximity(100.0);
    robot
        .router
        .handle_payload(br#"{"type":"command","command":"shoot"}"#)
        .await
        .unwrap();
    assert_eq!(robot.events.try_recv().unwrap().name, EventName::Score);
    assert!(robot.events.try_recv().is_err());
    assert!(!robot.state.scoring_mode());

    monitors.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn directive_overrides_patrol_leg() {
    let robot = robot();
    let monitors = robot.spawn_monitors();

    robot
        .router
        .handle_payload(br#"{"type":"command","command":"patrol"}"#)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!robot.sim.calls().is_empty());

    // Last command wins on every wheel it touches
    robot
        .router
        .handle_payload(br#"{"type":"move","direction":"left","duration":5,"speed":100}"#)
        .await
        .unwrap();
    assert_eq!(robot.sim.speed(Motor::Left), 50.0);
    assert_eq!(robot.sim.speed(Motor::Right), 50.0);
    assert_eq!(robot.sim.speed(Motor::Back), -100.0);
    assert!(robot.state.patrol_mode());

    monitors.shutdown().await;
}
