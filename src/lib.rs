//! Typed embedding layer for an opaque, host-controlled WebGL player.
//!
//! The player itself (loader, renderer, message dispatcher) is a black box.
//! This crate owns what sits around it: validating the configuration,
//! driving the bootstrap, relaying the player's output and keeping the
//! instance on a strict lifecycle while the page talks to it.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lifecycle;
pub mod protocol;
pub mod runtime;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ContextAttributes, PlayerConfig, PowerPreference};
pub use error::{Error, Result};
pub use lifecycle::{Creation, Player, State, SurfaceRegistry, Teardown};
pub use protocol::{Message, MessageParam};
pub use runtime::{Bootstrap, RuntimeInstance, SurfaceTarget};
