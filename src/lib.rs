//! Opportunity desk
//!
//! A single-session assistant for government contracting opportunities: a
//! notice is ingested, the user picks a specialized assistant, and the two
//! converse. The session core is a pure state machine; the runtime carries
//! out its effects against pluggable collaborators.

pub mod adapters;
pub mod api;
pub mod config;
pub mod runtime;
pub mod session;
