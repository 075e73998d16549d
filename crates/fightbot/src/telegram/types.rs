//! Handler types and dependencies

use std::sync::Arc;

use fightcore::Engine;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub engine: Arc<Engine>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}
