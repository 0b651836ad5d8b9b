//! HttpStudyService: reqwest client for the study service REST API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::StudyService;
use crate::error::ServiceError;
use crate::model::{Session, SessionEnded, SessionId, Topic, TopicId};

/// Client bound to one service base address.
#[derive(Debug, Clone)]
pub struct HttpStudyService {
    base_url: Url,
    http_client: Client,
}

impl HttpStudyService {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(mut base_url: Url, http_client: Client) -> Self {
        // Url::join drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            http_client,
        }
    }

    /// Parse `base_url` and build a client.
    pub fn from_base(base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path)?)
    }

    async fn check(resp: Response) -> Result<Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        tracing::warn!(status = status.as_u16(), %message, "study service rejected request");
        Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
        Ok(Self::check(resp).await?.json::<T>().await?)
    }
}

#[async_trait]
impl StudyService for HttpStudyService {
    async fn list_topics(&self) -> Result<Vec<Topic>, ServiceError> {
        let url = self.endpoint("topics/")?;
        let resp = self.http_client.get(url).send().await?;
        Self::decode(resp).await
    }

    async fn list_sessions(&self, topic_id: Option<TopicId>) -> Result<Vec<Session>, ServiceError> {
        let mut url = self.endpoint("sessions/")?;
        if let Some(topic_id) = topic_id {
            url.query_pairs_mut()
                .append_pair("topic_id", &topic_id.to_string());
        }
        let resp = self.http_client.get(url).send().await?;
        Self::decode(resp).await
    }

    async fn start_session(&self, topic_id: TopicId) -> Result<Session, ServiceError> {
        let url = self.endpoint("sessions/start")?;
        let resp = self
            .http_client
            .post(url)
            .json(&json!({ "topic_id": topic_id }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn end_session(
        &self,
        session_id: SessionId,
        duration_minutes: u64,
    ) -> Result<SessionEnded, ServiceError> {
        let url = self.endpoint(&format!("sessions/{session_id}/end"))?;
        let resp = self
            .http_client
            .post(url)
            .json(&json!({ "duration_minutes": duration_minutes }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn delete_session(&self, session_id: SessionId) -> Result<(), ServiceError> {
        let url = self.endpoint(&format!("sessions/{session_id}"))?;
        let resp = self.http_client.delete(url).send().await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn delete_topic(&self, topic_id: TopicId) -> Result<(), ServiceError> {
        let url = self.endpoint(&format!("topics/{topic_id}"))?;
        let resp = self.http_client.delete(url).send().await?;
        Self::check(resp).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_without_trailing_slash_keeps_prefix() {
        let service = HttpStudyService::from_base("http://localhost:8000/api").unwrap();
        assert_eq!(
            service.endpoint("sessions/start").unwrap().as_str(),
            "http://localhost:8000/api/sessions/start"
        );
    }

    #[test]
    fn bare_host_joins_routes() {
        let service = HttpStudyService::from_base("http://localhost:8000").unwrap();
        assert_eq!(
            service.endpoint("topics/").unwrap().as_str(),
            "http://localhost:8000/topics/"
        );
        assert_eq!(
            service.endpoint("sessions/12/end").unwrap().as_str(),
            "http://localhost:8000/sessions/12/end"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(matches!(
            HttpStudyService::from_base("not a url"),
            Err(ServiceError::InvalidUrl(_))
        ));
    }
}
