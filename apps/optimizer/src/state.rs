use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::generator::ResumeAi;
use crate::layout::PageConfig;
use crate::session::EditSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one edit session. Lock only for synchronous work, never across `.await`.
    pub session: Arc<Mutex<EditSession>>,
    /// Pluggable AI backend. Production: `LlmClient`.
    pub ai: Arc<dyn ResumeAi>,
    pub config: Config,
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(ai: Arc<dyn ResumeAi>, config: Config, page_config: PageConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(EditSession::new(config.max_pages))),
            ai,
            config,
            page_config,
        }
    }

    pub fn session(&self) -> Result<MutexGuard<'_, EditSession>, AppError> {
        self.session
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("session lock poisoned")))
    }
}
