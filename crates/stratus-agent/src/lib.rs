//! # Stratus Agent
//!
//! Runtime layer that wires the pure engines to the outside world.
//!
//! - [`config`]: TOML configuration with per-section defaults
//! - [`logging`]: `tracing` subscriber installation
//! - [`AgentEffects`]: the bundle of effect handlers every service uses
//! - [`ReachabilityService`]: "can this device reach port N?" and open-port listings
//! - [`ResourceLifecycle`]: start/stop a resource and wait for it to settle
//!
//! Nothing here holds global state; every service receives its
//! configuration and handlers explicitly.

#![forbid(unsafe_code)]

pub mod config;
pub mod effects;
pub mod lifecycle;
pub mod logging;
pub mod reachability;

pub use config::{
    default_config_path, default_storage_path, AgentConfig, BackoffSection, LoggingConfig,
    ReachabilityConfig,
};
pub use effects::AgentEffects;
pub use lifecycle::{ResourceLifecycle, ResourcePollReport};
pub use logging::init_logging;
pub use reachability::ReachabilityService;
