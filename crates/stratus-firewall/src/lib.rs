//! Stratus Firewall - security group reasoning
//!
//! Pure, synchronous functions over security groups:
//! - [`ingest`]: validate raw records from the cloud API
//! - [`authorization`]: decide whether an address may reach a port
//! - [`summary`]: list the exposed ports for display

#![forbid(unsafe_code)]

pub mod authorization;
pub mod ingest;
pub mod summary;

pub use authorization::{authorize, authorize_rules};
pub use ingest::{ingest_group, ingest_groups, ingest_rule};
pub use summary::{port_label, summarize, summarize_groups};
