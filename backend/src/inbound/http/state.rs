//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they
//! only depend on domain ports (use-cases) and remain testable without
//! I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, ItemCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub items: Arc<dyn ItemCommand>,
}

impl HttpState {
    pub fn new(auth: Arc<dyn AuthService>, items: Arc<dyn ItemCommand>) -> Self {
        Self { auth, items }
    }
}
