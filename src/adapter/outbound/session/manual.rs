//! Operator-supplied session results.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::id::SessionId;
use crate::domain::settlement::SessionResult;
use crate::error::{ConfigError, Result};
use crate::port::outbound::session::SessionResultSource;

/// Session results provided up front, e.g. from the command line.
#[derive(Debug, Default)]
pub struct ManualSessionSource {
    results: RwLock<HashMap<SessionId, SessionResult>>,
}

impl ManualSessionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source holding a single result.
    pub fn with_result(result: SessionResult) -> Self {
        let source = Self::new();
        source.insert(result);
        source
    }

    /// Add or replace the result for its session.
    pub fn insert(&self, result: SessionResult) {
        self.results
            .write()
            .insert(result.session_id.clone(), result);
    }
}

#[async_trait]
impl SessionResultSource for ManualSessionSource {
    async fn get_result(&self, session_id: &SessionId) -> Result<SessionResult> {
        self.results.read().get(session_id).cloned().ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "session",
                reason: format!("no result recorded for session {session_id}"),
            }
            .into()
        })
    }
}
