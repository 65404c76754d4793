// Zenoh transport around the robot core
//
// Directives come in on <prefix>/directive, events go out on
// <prefix>/event/<name>, and the mode flags are published on <prefix>/state
// once a second. Sensor values for the simulated base can be injected on
// <prefix>/sim/proximity and <prefix>/sim/load.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::config::{
    DEFAULT_KEY_PREFIX, MonitorConfig, STATE_PUBLISH_PERIOD, TOPIC_DIRECTIVE, TOPIC_EVENT,
    TOPIC_SIM_LOAD, TOPIC_SIM_PROXIMITY, TOPIC_STATE, topic,
};
use crate::events::{Event, EventName, EventSink};
use crate::monitor::Monitors;
use crate::motor::{Actuator, MotionEngine, Motor, SimulatedBase};
use crate::presets::PresetComposer;
use crate::router::CommandRouter;
use crate::state::RobotState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Settings for a runtime instance
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub key_prefix: String,
    pub monitor: MonitorConfig,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            monitor: MonitorConfig::default(),
        }
    }
}

/// Key an event is published under
pub fn event_topic(prefix: &str, name: EventName) -> String {
    topic(prefix, &format!("{}/{}", TOPIC_EVENT, name.as_str()))
}

/// Parse an injected sensor value
fn parse_reading(payload: &[u8]) -> Option<f32> {
    match serde_json::from_slice::<f32>(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse sensor value: {}", e);
            None
        }
    }
}

pub async fn run(options: RuntimeOptions) -> Result<(), BoxError> {
    let prefix = options.key_prefix.as_str();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let directive_topic = topic(prefix, TOPIC_DIRECTIVE);
    let directives = session.declare_subscriber(directive_topic.as_str()).await?;
    let proximity = session
        .declare_subscriber(topic(prefix, TOPIC_SIM_PROXIMITY))
        .await?;
    let load = session.declare_subscriber(topic(prefix, TOPIC_SIM_LOAD)).await?;
    let pub_state = session.declare_publisher(topic(prefix, TOPIC_STATE)).await?;

    // Hardware bindings are external; the simulated base stands in for them
    let base = SimulatedBase::new();
    let actuator: Arc<dyn Actuator> = Arc::new(base.clone());
    let state = Arc::new(RobotState::new());
    let engine = Arc::new(MotionEngine::new(Arc::clone(&actuator), Arc::clone(&state)));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let events: Arc<dyn EventSink> = Arc::new(event_tx);

    let presets = PresetComposer::new(Arc::clone(&engine), Arc::clone(&state), Arc::clone(&events));
    let router = CommandRouter::new(Arc::clone(&engine), presets);

    let monitors = Monitors::spawn(
        engine,
        Arc::clone(&actuator),
        Arc::new(base.clone()),
        Arc::clone(&state),
        events,
        options.monitor,
    );

    info!("Runtime started, listening on {}", directive_topic);

    let mut tick = interval(STATE_PUBLISH_PERIOD);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // Only a dead subscription ends the loop early; teardown runs either way
    let served = async {
        loop {
            tokio::select! {
                sample = directives.recv_async() => {
                    let sample = sample?;
                    let payload = sample.payload().to_bytes();
                    if let Err(e) = router.handle_payload(&payload).await {
                        debug!("Directive dropped: {}", e);
                    }
                }
                Some(event) = event_rx.recv() => {
                    let key = event_topic(prefix, event.name);
                    match serde_json::to_string(&event) {
                        Ok(json) => {
                            info!("Event {} -> {}", json, key);
                            if let Err(e) = session.put(key, json).await {
                                warn!("Failed to publish event: {}", e);
                            }
                        }
                        Err(e) => warn!("Failed to serialize event: {}", e),
                    }
                }
                sample = proximity.recv_async() => {
                    if let Some(value) = parse_reading(&sample?.payload().to_bytes()) {
                        base.set_proximity(value);
                    }
                }
                sample = load.recv_async() => {
                    if let Some(value) = parse_reading(&sample?.payload().to_bytes()) {
                        base.set_load(value);
                    }
                }
                _ = tick.tick() => {
                    match serde_json::to_string(&state.snapshot()) {
                        Ok(state_json) => {
                            if let Err(e) = pub_state.put(state_json).await {
                                warn!("Failed to publish state: {}", e);
                            }
                        }
                        Err(e) => warn!("Failed to serialize state: {}", e),
                    }
                }
                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                    info!("Shutting down");
                    return Ok::<(), BoxError>(());
                }
            }
        }
    }
    .await;

    if let Err(e) = &served {
        error!("Runtime loop failed: {}", e);
    }
    power_down(monitors, actuator.as_ref()).await;
    let closed = session.close().await;
    served?;
    closed?;
    Ok(())
}

/// Stop the monitors, then cut power to every motor
async fn power_down(monitors: Monitors, actuator: &dyn Actuator) {
    monitors.shutdown().await;
    for motor in Motor::ALL {
        if let Err(e) = actuator.off(motor).await {
            warn!("Failed to turn off {:?}: {}", motor, e);
        }
    }
}
