//! Local copy of the service's topics and sessions.
//!
//! Views read statistics and the ace from a snapshot instead of the
//! service. Deletions go to the service first and only touch the local
//! lists once the service has confirmed them.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::ace::{ace_progress, AceProgress};
use crate::error::ServiceError;
use crate::model::{Session, SessionId, Topic, TopicId};
use crate::service::StudyService;
use crate::stats::StudyReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudySnapshot {
    pub topics: Vec<Topic>,
    pub sessions: Vec<Session>,
}

impl StudySnapshot {
    pub fn new(topics: Vec<Topic>, sessions: Vec<Session>) -> Self {
        Self { topics, sessions }
    }

    /// Fetch topics and sessions (optionally for one topic) concurrently.
    pub async fn fetch(
        service: &dyn StudyService,
        topic_filter: Option<TopicId>,
    ) -> Result<Self, ServiceError> {
        let (topics, sessions) = tokio::try_join!(
            service.list_topics(),
            service.list_sessions(topic_filter)
        )?;
        tracing::debug!(
            topics = topics.len(),
            sessions = sessions.len(),
            "fetched study snapshot"
        );
        Ok(Self { topics, sessions })
    }

    pub fn topic(&self, topic_id: TopicId) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    pub fn report<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> StudyReport {
        StudyReport::compute(&self.sessions, &self.topics, today, tz)
    }

    pub fn ace(&self) -> Option<AceProgress> {
        ace_progress(&self.topics)
    }

    /// Delete a session on the service, then drop it locally.
    pub async fn delete_session(
        &mut self,
        service: &dyn StudyService,
        session_id: SessionId,
    ) -> Result<(), ServiceError> {
        service.delete_session(session_id).await?;
        self.sessions.retain(|s| s.id != session_id);
        tracing::info!(session_id, "session deleted");
        Ok(())
    }

    /// Delete a topic on the service, then drop it locally.
    pub async fn delete_topic(
        &mut self,
        service: &dyn StudyService,
        topic_id: TopicId,
    ) -> Result<(), ServiceError> {
        service.delete_topic(topic_id).await?;
        self.topics.retain(|t| t.id != topic_id);
        tracing::info!(topic_id, "topic deleted");
        Ok(())
    }
}
