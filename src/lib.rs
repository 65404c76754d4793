pub mod config;
pub mod events;
pub mod messages;
pub mod monitor;
pub mod motor;
pub mod presets;
pub mod router;
pub mod runtime;
pub mod state;
pub mod symbols;
