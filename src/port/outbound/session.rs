//! Session result port.

use async_trait::async_trait;

use crate::domain::id::SessionId;
use crate::domain::settlement::SessionResult;
use crate::error::Result;

/// Port for looking up the outcome of an arbitrage session.
#[async_trait]
pub trait SessionResultSource: Send + Sync {
    async fn get_result(&self, session_id: &SessionId) -> Result<SessionResult>;
}
