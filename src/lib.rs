pub mod config;
pub mod core;
pub mod telemetry;

pub use config::{BackendKind, KioskConfig};
pub use core::{
    backend::Backend,
    error::{KioskError, Result},
};

#[cfg(feature = "gui")]
pub mod gui;
