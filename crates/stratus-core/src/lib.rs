//! Stratus Core - value types and effect interfaces
//!
//! Foundation layer for the reachability and state-convergence engine. It
//! holds the pure pieces (address codec, CIDR matching, firewall and
//! resource value types) and the effect traits every higher layer is
//! written against.
//!
//! ## Pure components
//! - [`address`]: dotted-quad IPv4 parsing and formatting
//! - [`cidr`]: bit-exact prefix matching
//! - [`firewall`]: validated rules and groups, raw API records
//! - [`resource`]: resource identifiers and lifecycle states
//! - [`poll`]: terminal outcomes of a convergence poll
//!
//! ## Effect interfaces
//! - `ResourceQueryEffects`, `DeviceAddressEffects`: external collaborators
//! - `PresentationEffects`: result sink
//! - `TimeEffects`, `RandomEffects`, `CancellationToken`: injected runtime

#![forbid(unsafe_code)]

pub mod address;
pub mod cidr;
pub mod effects;
pub mod errors;
pub mod firewall;
pub mod poll;
pub mod resource;

pub use address::Ipv4Address;
pub use cidr::{matches, CidrBlock, MAX_PREFIX_LEN};
pub use errors::{Result as StratusResult, StratusError};
pub use firewall::{
    AuthorizationOutcome, GroupFilter, PermissionRecord, PermissionRule, Protocol, SecurityGroup,
    SecurityGroupRecord,
};
pub use poll::PollOutcome;
pub use resource::{ResourceId, ResourceState};

pub use effects::{
    CancellationToken, DeviceAddressEffects, NeverCancel, PresentationEffects, RandomEffects,
    ResourcePollOutcome, ResourceQueryEffects, TimeEffects,
};
