// Dispatch inbound directives to the motion engine or presets

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::DEFAULT_PRESET_SPEED;
use crate::messages::{Directive, DirectiveError};
use crate::motor::{MotionEngine, MoveRequest};
use crate::presets::PresetComposer;
use crate::symbols::{Command, Direction};

pub struct CommandRouter {
    engine: Arc<MotionEngine>,
    presets: PresetComposer,
}

impl CommandRouter {
    pub fn new(engine: Arc<MotionEngine>, presets: PresetComposer) -> Self {
        Self { engine, presets }
    }

    /// Handle a raw payload
    ///
    /// Malformed payloads are logged and dropped, they never reach the robot.
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<(), DirectiveError> {
        match Directive::from_slice(payload) {
            Ok(Some(directive)) => {
                self.dispatch(directive).await;
                Ok(())
            }
            Ok(None) => {
                debug!("Ignoring directive with unhandled type");
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Malformed directive ({}): {}",
                    e,
                    String::from_utf8_lossy(payload)
                );
                Err(e)
            }
        }
    }

    /// Run a parsed directive; unknown symbols are ignored
    pub async fn dispatch(&self, directive: Directive) {
        info!("Directive: {:?}", directive);
        match directive {
            Directive::Move {
                direction,
                duration,
                speed,
            } => match Direction::resolve_move(&direction) {
                Some(direction) => {
                    self.engine
                        .move_base(MoveRequest::new(direction, duration, speed))
                        .await
                }
                None => debug!("Unknown direction '{}'", direction),
            },
            Directive::Rotate {
                rotation,
                duration,
                speed,
            } => match Direction::resolve_rotation(&rotation) {
                Some(direction) => {
                    self.engine
                        .turn(MoveRequest::new(direction, duration, speed))
                        .await
                }
                None => debug!("Unknown rotation '{}'", rotation),
            },
            Directive::Command { command } => match Command::resolve(&command) {
                Some(command) => self.presets.activate(command, DEFAULT_PRESET_SPEED).await,
                None => debug!("Unknown command '{}'", command),
            },
        }
    }
}
