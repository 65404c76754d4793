// Background monitors
//
// Each monitor is a polling task gated by one mode flag. All of them share a
// shutdown signal that is checked at every poll boundary.

mod patrol;
mod possession;
mod proximity;

pub use patrol::{PatrolLeg, PatrolMonitor, pick_leg};
pub use possession::PossessionMonitor;
pub use proximity::ProximityMonitor;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::events::EventSink;
use crate::motor::{Actuator, MotionEngine, Sensors};
use crate::state::RobotState;

/// Counts consecutive qualifying samples
///
/// Fires on the sample that takes the count past the limit, then starts over.
/// A single non-qualifying sample resets the count.
#[derive(Debug, Clone)]
pub struct Debouncer {
    limit: u32,
    count: u32,
}

impl Debouncer {
    pub fn new(limit: u32) -> Self {
        Self { limit, count: 0 }
    }

    pub fn sample(&mut self, qualifies: bool) -> bool {
        if !qualifies {
            self.count = 0;
            return false;
        }
        self.count += 1;
        if self.count > self.limit {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Sleep for `period` unless shutdown is requested first
///
/// Returns false when the monitor should exit.
pub(crate) async fn pause(shutdown: &mut watch::Receiver<bool>, period: Duration) -> bool {
    if *shutdown.borrow() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(period) => !*shutdown.borrow(),
        changed = shutdown.changed() => match changed {
            Ok(()) => !*shutdown.borrow(),
            // Sender gone, nobody can stop us any more
            Err(_) => false,
        },
    }
}

/// Handles to the three running monitors
pub struct Monitors {
    shutdown: watch::Sender<bool>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Monitors {
    /// Spawn patrol, proximity and possession monitors
    pub fn spawn(
        engine: Arc<MotionEngine>,
        actuator: Arc<dyn Actuator>,
        sensors: Arc<dyn Sensors>,
        state: Arc<RobotState>,
        events: Arc<dyn EventSink>,
        config: MonitorConfig,
    ) -> Self {
        let (shutdown, rx) = watch::channel(false);

        let patrol = PatrolMonitor::new(engine, Arc::clone(&state), config.clone());
        let proximity = ProximityMonitor::new(
            Arc::clone(&sensors),
            Arc::clone(&state),
            Arc::clone(&events),
            config.clone(),
        );
        let possession = PossessionMonitor::new(actuator, sensors, state, events, config);

        let handles = vec![
            ("patrol", tokio::spawn(patrol.run(rx.clone()))),
            ("proximity", tokio::spawn(proximity.run(rx.clone()))),
            ("possession", tokio::spawn(possession.run(rx))),
        ];
        info!("Started {} monitors", handles.len());

        Self { shutdown, handles }
    }

    /// Signal every monitor to stop and wait for them to exit
    pub async fn shutdown(self) {
        self.shutdown.send_replace(true);
        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                warn!("{} monitor ended abnormally: {}", name, e);
            }
        }
        info!("Monitors stopped");
    }
}
