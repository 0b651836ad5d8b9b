//! Study service boundary.
//!
//! Topics, sessions, experience awards and evolution eligibility all live
//! behind this trait. The timer only needs `start_session`/`end_session`;
//! the statistics views need the listing calls.

mod http;

pub use http::HttpStudyService;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::model::{Session, SessionEnded, SessionId, Topic, TopicId};

#[async_trait]
pub trait StudyService: Send + Sync {
    /// `GET /topics/`
    async fn list_topics(&self) -> Result<Vec<Topic>, ServiceError>;

    /// `GET /sessions/[?topic_id=ID]`
    async fn list_sessions(&self, topic_id: Option<TopicId>) -> Result<Vec<Session>, ServiceError>;

    /// `POST /sessions/start`. The returned id becomes the active session.
    async fn start_session(&self, topic_id: TopicId) -> Result<Session, ServiceError>;

    /// `POST /sessions/{id}/end`
    async fn end_session(
        &self,
        session_id: SessionId,
        duration_minutes: u64,
    ) -> Result<SessionEnded, ServiceError>;

    /// `DELETE /sessions/{id}`
    async fn delete_session(&self, session_id: SessionId) -> Result<(), ServiceError>;

    /// `DELETE /topics/{id}`
    async fn delete_topic(&self, topic_id: TopicId) -> Result<(), ServiceError>;
}
