// In-process driver for running without hardware
//
// Tracks a target speed per motor, expires timed runs, records every call
// and serves scripted sensor samples. Failures can be scripted too: a sensor
// read can be made to fail and a motor can be unplugged.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use super::driver::{Actuator, DriverError, Motor, Result, Sensors};
use crate::config::{SIM_IDLE_LOAD, SIM_IDLE_PROXIMITY};

/// One call received by the simulated driver
#[derive(Debug, Clone, PartialEq)]
pub enum ActuationCall {
    RunForSeconds {
        motor: Motor,
        speed: f32,
        seconds: f32,
        blocking: bool,
    },
    RunContinuous {
        motor: Motor,
        speed: f32,
    },
    Stop(Motor),
    Off(Motor),
}

impl ActuationCall {
    pub fn motor(&self) -> Motor {
        match self {
            ActuationCall::RunForSeconds { motor, .. }
            | ActuationCall::RunContinuous { motor, .. }
            | ActuationCall::Stop(motor)
            | ActuationCall::Off(motor) => *motor,
        }
    }
}

#[derive(Debug, Default)]
struct MotorState {
    speed: f32,
    // Bumped on every command so an expiring timed run can tell it was superseded
    generation: u64,
    // Pending end of a non-blocking timed run
    expiry: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct SampleSource {
    sensor: &'static str,
    // None marks a failed read
    scripted: VecDeque<Option<f32>>,
    steady: f32,
}

impl SampleSource {
    fn new(sensor: &'static str, steady: f32) -> Self {
        Self {
            sensor,
            scripted: VecDeque::new(),
            steady,
        }
    }

    fn next(&mut self) -> Result<f32> {
        match self.scripted.pop_front() {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(DriverError::SensorRead(format!("no {} sample", self.sensor))),
            None => Ok(self.steady),
        }
    }
}

#[derive(Debug)]
struct SimState {
    motors: HashMap<Motor, MotorState>,
    disconnected: HashSet<Motor>,
    calls: Vec<ActuationCall>,
    proximity: SampleSource,
    load: SampleSource,
}

impl SimState {
    fn command(&mut self, motor: Motor, speed: f32, call: ActuationCall) -> Result<u64> {
        if self.disconnected.contains(&motor) {
            return Err(DriverError::Disconnected(motor));
        }
        let state = self.motors.entry(motor).or_default();
        if let Some(expiry) = state.expiry.take() {
            expiry.abort();
        }
        state.speed = speed;
        state.generation += 1;
        let generation = state.generation;
        self.calls.push(call);
        Ok(generation)
    }

    fn expire(&mut self, motor: Motor, generation: u64) {
        let state = self.motors.entry(motor).or_default();
        if state.generation == generation {
            debug!("Timed run on {:?} finished", motor);
            state.speed = 0.0;
            state.expiry = None;
        }
    }
}

/// Simulated motors and sensors
#[derive(Debug, Clone)]
pub struct SimulatedBase {
    inner: Arc<Mutex<SimState>>,
}

impl Default for SimulatedBase {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBase {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimState {
                motors: HashMap::new(),
                disconnected: HashSet::new(),
                calls: Vec::new(),
                proximity: SampleSource::new("proximity", SIM_IDLE_PROXIMITY),
                load: SampleSource::new("load", SIM_IDLE_LOAD),
            })),
        }
    }

    /// Current target speed of a motor
    pub fn speed(&self, motor: Motor) -> f32 {
        self.inner.lock().motors.get(&motor).map_or(0.0, |m| m.speed)
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<ActuationCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Number of timed runs still waiting to expire
    pub fn pending_expiries(&self) -> usize {
        self.inner
            .lock()
            .motors
            .values()
            .filter(|m| m.expiry.as_ref().is_some_and(|h| !h.is_finished()))
            .count()
    }

    /// Unplug or replug a motor; commands to an unplugged motor fail
    pub fn set_connected(&self, motor: Motor, connected: bool) {
        let mut sim = self.inner.lock();
        if connected {
            sim.disconnected.remove(&motor);
        } else {
            sim.disconnected.insert(motor);
        }
    }

    /// Queue proximity samples served before falling back to the steady value
    pub fn script_proximity(&self, samples: impl IntoIterator<Item = f32>) {
        self.inner.lock().proximity.scripted.extend(samples.into_iter().map(Some));
    }

    /// Queue one failed proximity read
    pub fn script_proximity_failure(&self) {
        self.inner.lock().proximity.scripted.push_back(None);
    }

    pub fn set_proximity(&self, value: f32) {
        self.inner.lock().proximity.steady = value;
    }

    /// Queue kicker load samples served before falling back to the steady value
    pub fn script_load(&self, samples: impl IntoIterator<Item = f32>) {
        self.inner.lock().load.scripted.extend(samples.into_iter().map(Some));
    }

    /// Queue one failed kicker load read
    pub fn script_load_failure(&self) {
        self.inner.lock().load.scripted.push_back(None);
    }

    pub fn set_load(&self, value: f32) {
        self.inner.lock().load.steady = value;
    }
}

#[async_trait]
impl Actuator for SimulatedBase {
    async fn run_for_seconds(
        &self,
        motor: Motor,
        speed: f32,
        seconds: f32,
        blocking: bool,
    ) -> Result<()> {
        let call = ActuationCall::RunForSeconds {
            motor,
            speed,
            seconds,
            blocking,
        };
        let run_time = Duration::from_secs_f32(seconds.max(0.0));

        if blocking {
            let generation = self.inner.lock().command(motor, speed, call)?;
            tokio::time::sleep(run_time).await;
            self.inner.lock().expire(motor, generation);
        } else {
            let mut sim = self.inner.lock();
            let generation = sim.command(motor, speed, call)?;
            let inner = Arc::clone(&self.inner);
            let expiry = tokio::spawn(async move {
                tokio::time::sleep(run_time).await;
                inner.lock().expire(motor, generation);
            });
            sim.motors.entry(motor).or_default().expiry = Some(expiry);
        }
        Ok(())
    }

    async fn run_continuous(&self, motor: Motor, speed: f32) -> Result<()> {
        self.inner
            .lock()
            .command(motor, speed, ActuationCall::RunContinuous { motor, speed })?;
        Ok(())
    }

    async fn stop(&self, motor: Motor) -> Result<()> {
        self.inner.lock().command(motor, 0.0, ActuationCall::Stop(motor))?;
        Ok(())
    }

    async fn off(&self, motor: Motor) -> Result<()> {
        self.inner.lock().command(motor, 0.0, ActuationCall::Off(motor))?;
        Ok(())
    }
}

#[async_trait]
impl Sensors for SimulatedBase {
    async fn read_proximity(&self) -> Result<f32> {
        self.inner.lock().proximity.next()
    }

    async fn read_actuator_load(&self) -> Result<f32> {
        self.inner.lock().load.next()
    }
}
