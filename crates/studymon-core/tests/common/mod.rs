//! In-memory study service for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use studymon_core::model::{SessionId, TopicId};
use studymon_core::{
    EvolutionEvent, ServiceError, Session, SessionEnded, StudyService, Topic, TopicStatus,
};

#[derive(Default)]
pub struct FakeStudyService {
    pub topics: Mutex<Vec<Topic>>,
    pub sessions: Mutex<Vec<Session>>,
    /// (session id, duration) of every accepted end request
    pub ended: Mutex<Vec<(SessionId, u64)>>,
    pub end_attempts: Mutex<Vec<(SessionId, u64)>>,
    pub fail_start: AtomicBool,
    pub fail_end: AtomicBool,
    pub fail_delete: AtomicBool,
    /// Attached to the next successful end response
    pub evolution: Mutex<Option<EvolutionEvent>>,
    next_id: AtomicI64,
}

impl FakeStudyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topics(topics: Vec<Topic>) -> Self {
        let service = Self::default();
        *service.topics.lock().unwrap() = topics;
        service
    }

    pub fn with_snapshot(topics: Vec<Topic>, sessions: Vec<Session>) -> Self {
        let service = Self::with_topics(topics);
        *service.sessions.lock().unwrap() = sessions;
        service
    }

    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_end(&self, fail: bool) {
        self.fail_end.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn evolve_next(&self, event: EvolutionEvent) {
        *self.evolution.lock().unwrap() = Some(event);
    }

    pub fn ended(&self) -> Vec<(SessionId, u64)> {
        self.ended.lock().unwrap().clone()
    }

    pub fn end_attempts(&self) -> usize {
        self.end_attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl StudyService for FakeStudyService {
    async fn list_topics(&self) -> Result<Vec<Topic>, ServiceError> {
        Ok(self.topics.lock().unwrap().clone())
    }

    async fn list_sessions(&self, topic_id: Option<TopicId>) -> Result<Vec<Session>, ServiceError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .filter(|s| topic_id.map_or(true, |id| s.topic_id == id))
            .cloned()
            .collect())
    }

    async fn start_session(&self, topic_id: TopicId) -> Result<Session, ServiceError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                status: 404,
                message: "Topic not found".into(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let session = Session {
            id,
            topic_id,
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            end_time: None,
            duration_minutes: 0,
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn end_session(
        &self,
        session_id: SessionId,
        duration_minutes: u64,
    ) -> Result<SessionEnded, ServiceError> {
        self.end_attempts
            .lock()
            .unwrap()
            .push((session_id, duration_minutes));
        if self.fail_end.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                status: 503,
                message: "connection reset".into(),
            });
        }
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| ServiceError::Status {
                status: 404,
                message: "Session not found".into(),
            })?;
        session.end_time = Some(session.start_time);
        session.duration_minutes = duration_minutes;
        self.ended.lock().unwrap().push((session_id, duration_minutes));
        Ok(SessionEnded {
            session: session.clone(),
            evolution: self.evolution.lock().unwrap().take(),
        })
    }

    async fn delete_session(&self, session_id: SessionId) -> Result<(), ServiceError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                status: 503,
                message: "offline".into(),
            });
        }
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn delete_topic(&self, topic_id: TopicId) -> Result<(), ServiceError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                status: 503,
                message: "offline".into(),
            });
        }
        self.topics.lock().unwrap().retain(|t| t.id != topic_id);
        Ok(())
    }
}

pub fn topic(id: TopicId, title: &str) -> Topic {
    Topic {
        id,
        title: title.to_string(),
        description: String::new(),
        status: TopicStatus::NotStarted,
        minutes_spent: 0,
        created_at: None,
        pokemon_id: None,
        pokemon_name: None,
        pokemon_sprite: None,
        pokemon_level: None,
        pokemon_exp: None,
    }
}

pub fn session(id: SessionId, topic_id: TopicId, minutes: u64, start: &str) -> Session {
    Session {
        id,
        topic_id,
        start_time: start.parse().unwrap(),
        end_time: None,
        duration_minutes: minutes,
    }
}

pub fn evolution() -> EvolutionEvent {
    EvolutionEvent {
        from_id: 1,
        from_name: "Bulbasaur".into(),
        to_id: 2,
        to_name: "Ivysaur".into(),
        at_level: 16,
    }
}
