//! State shared between the various passes.
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use types::Database;

/// State that is shared between the checker's passes.
pub struct State {
    pub config: Config,
    pub diagnostics: Diagnostics,
    pub db: Database,
}

impl State {
    pub fn new(config: Config) -> Self {
        Self { config, diagnostics: Diagnostics::new(), db: Database::new() }
    }
}
