// Watches for an obstacle closing in while scoring

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Debouncer, pause};
use crate::config::MonitorConfig;
use crate::events::{Event, EventSink};
use crate::motor::Sensors;
use crate::state::RobotState;

pub struct ProximityMonitor {
    sensors: Arc<dyn Sensors>,
    state: Arc<RobotState>,
    events: Arc<dyn EventSink>,
    config: MonitorConfig,
    debounce: Debouncer,
}

impl ProximityMonitor {
    pub fn new(
        sensors: Arc<dyn Sensors>,
        state: Arc<RobotState>,
        events: Arc<dyn EventSink>,
        config: MonitorConfig,
    ) -> Self {
        let debounce = Debouncer::new(config.debounce_limit);
        Self {
            sensors,
            state,
            events,
            config,
            debounce,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        debug!("Proximity monitor running");
        loop {
            if self.state.scoring_mode() {
                self.debounce.reset();
                while self.state.scoring_mode() {
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

    /// Take one reading; true once the obstacle has been confirmed
    async fn sample(&mut self) -> bool {
        let distance = match self.sensors.read_proximity().await {
            Ok(distance) => Some(distance),
            Err(e) => {
                warn!("Proximity read failed: {}", e);
                None
            }
        };
        debug!("Proximity: {:?}", distance);

        let close = matches!(distance, Some(d) if d < self.config.proximity_threshold);
        if !self.debounce.sample(close) {
            return false;
        }

        let distance = distance.unwrap_or_default();
        info!("Closing in at {}, sending event", distance);
        self.events.emit(Event::closing(distance));
        self.state.set_closing(true);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventName;
    use crate::motor::sim::SimulatedBase;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_four_consecutive_close_samples() {
        let sim = SimulatedBase::new();
        let state = Arc::new(RobotState::new());
        let (tx, mut events) = unbounded_channel();
        let monitor = ProximityMonitor::new(
            Arc::new(sim.clone()),
            Arc::clone(&state),
            Arc::new(tx),
            MonitorConfig::default(),
        );

        sim.script_proximity([40.0, 40.0, 40.0, 60.0, 40.0, 40.0, 40.0, 30.0]);
        state.set_scoring_mode(true);
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(monitor.run(rx));

        // Seven samples taken at 0.2s spacing, no confirmation yet
        tokio::time::sleep(Duration::from_millis(1300)).await;
        assert!(events.try_recv().is_err());
        assert!(!state.closing());

        tokio::time::sleep(Duration::from_millis(700)).await;
        let event = events.try_recv().unwrap();
        assert_eq!(event.name, EventName::Closing);
        assert_eq!(event.payload.get("distance"), Some(&json!(30.0)));
        assert!(events.try_recv().is_err());
        assert!(state.closing());

        shutdown.send_replace(true);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_read_breaks_the_streak() {
        let sim = SimulatedBase::new();
        let state = Arc::new(RobotState::new());
        let (tx, mut events) = unbounded_channel();
        let monitor = ProximityMonitor::new(
            Arc::new(sim.clone()),
            Arc::clone(&state),
            Arc::new(tx),
            MonitorConfig::default(),
        );

        sim.script_proximity([40.0, 40.0, 40.0]);
        sim.script_proximity_failure();
        sim.script_proximity([40.0, 40.0, 40.0, 35.0]);
        state.set_scoring_mode(true);
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(monitor.run(rx));

        // The monitor keeps polling past the failure; still nothing after seven samples
        tokio::time::sleep(Duration::from_millis(1300)).await;
        assert!(events.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let event = events.try_recv().unwrap();
        assert_eq!(event.payload.get("distance"), Some(&json!(35.0)));
        assert!(state.closing());

        shutdown.send_replace(true);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_without_scoring_mode() {
        let sim = SimulatedBase::new();
        let state = Arc::new(RobotState::new());
        let (tx, mut events) = unbounded_channel();
        let monitor = ProximityMonitor::new(
            Arc::new(sim.clone()),
            Arc::clone(&state),
            Arc::new(tx),
            MonitorConfig::default(),
        );

        sim.set_proximity(10.0);
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(monitor.run(rx));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(events.try_recv().is_err());

        // Picked up on the next idle poll
        state.set_scoring_mode(true);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(events.try_recv().unwrap().name, EventName::Closing);

        shutdown.send_replace(true);
        task.await.unwrap();
    }
}
