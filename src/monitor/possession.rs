// Detects a captured ball from kicker motor load while taking

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Debouncer, pause};
use crate::config::MonitorConfig;
use crate::events::{Event, EventSink};
use crate::motor::{Actuator, Motor, Sensors};
use crate::state::RobotState;

pub struct PossessionMonitor {
    actuator: Arc<dyn Actuator>,
    sensors: Arc<dyn Sensors>,
    state: Arc<RobotState>,
    events: Arc<dyn EventSink>,
    config: MonitorConfig,
    debounce: Debouncer,
}

impl PossessionMonitor {
    pub fn new(
        actuator: Arc<dyn Actuator>,
        sensors: Arc<dyn Sensors>,
        state: Arc<RobotState>,
        events: Arc<dyn EventSink>,
        config: MonitorConfig,
    ) -> Self {
        let debounce = Debouncer::new(config.debounce_limit);
        Self {
            actuator,
            sensors,
            state,
            events,
            config,
            debounce,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        debug!("Possession monitor running");
        loop {
            if self.state.taking_mode() {
                self.debounce.reset();
                while self.state.taking_mode() {
                    if self.sample().await {
                        break;
                    }
                    if !pause(&mut shutdown, self.config.active_poll).await {
                        return;
                    }
                }
            }
            if !pause(&mut shutdown, self.config.idle_poll).await {
                return;
            }
        }
    }

    /// Take one load reading; true once the ball is confirmed held
    async fn sample(&mut self) -> bool {
        let held = match self.sensors.read_actuator_load().await {
            Ok(load) => {
                debug!("Kicker load: {}%", load);
                load > self.config.load_threshold
            }
            Err(e) => {
                warn!("Kicker load read failed: {}", e);
                false
            }
        };
        if !self.debounce.sample(held) {
            return false;
        }

        info!("Took the ball, sending event");
        self.events.emit(Event::taking());
        if let Err(e) = self.actuator.stop(Motor::Kicker).await {
            warn!("Failed to stop kicker: {}", e);
        }
        self.state.ball_taken();
        true
    }
}
