//! HTTP API for the opportunity desk
//!
//! A thin JSON surface over one [`SessionHandle`]; every command is forwarded
//! to the session runtime and its verdict mapped to a status code.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::SessionHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
}

impl AppState {
    #[must_use]
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}
