//! HTTP client for the remote students API.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderValue, PRAGMA};
use reqwest::Response;
use thiserror::Error;
use url::Url;

use crate::model::{Student, StudentFields, StudentPatch};

/// Students API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body text for non-success responses. May be empty.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

/// Remote CRUD operations on the `/students` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentsApi: Send + Sync {
    /// `GET /students`
    async fn list(&self) -> Result<Vec<Student>, ApiError>;

    /// `POST /students`
    async fn create(&self, student: &StudentFields) -> Result<(), ApiError>;

    /// `PUT /students/{studentId}` with only the changed fields.
    async fn update(&self, student_id: &str, patch: &StudentPatch) -> Result<(), ApiError>;

    /// `DELETE /students/{studentId}`
    async fn delete(&self, student_id: &str) -> Result<(), ApiError>;
}

/// reqwest-backed [`StudentsApi`].
#[derive(Debug, Clone)]
pub struct HttpStudentsApi {
    http: reqwest::Client,
    collection_url: Url,
}

impl HttpStudentsApi {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API base URL; `/students` is appended
    ///   (e.g. "https://example.execute-api.us-east-1.amazonaws.com/default")
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::new_with_client(base_url, http)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn new_with_client(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        let collection = format!("{}/students", base_url.trim().trim_end_matches('/'));
        let collection_url = Url::parse(&collection)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if collection_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http,
            collection_url,
        })
    }

    /// The `/students` collection URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.collection_url.as_str()
    }

    /// URL of a single student; the id is percent-encoded as one path segment.
    fn student_url(&self, student_id: &str) -> Result<Url, ApiError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.collection_url.to_string()))?
            .push(student_id);
        Ok(url)
    }

    /// Turn non-success responses into [`ApiError::Status`] carrying the body text.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StudentsApi for HttpStudentsApi {
    async fn list(&self) -> Result<Vec<Student>, ApiError> {
        log::debug!("GET {}", self.collection_url);
        let response = self
            .http
            .get(self.collection_url.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .header(PRAGMA, HeaderValue::from_static("no-cache"))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check_status(response).await?;
        let text = response.text().await.map_err(ApiError::from_reqwest)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create(&self, student: &StudentFields) -> Result<(), ApiError> {
        log::debug!("POST {} ({})", self.collection_url, student.student_id);
        let response = self
            .http
            .post(self.collection_url.clone())
            .json(student)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn update(&self, student_id: &str, patch: &StudentPatch) -> Result<(), ApiError> {
        let url = self.student_url(student_id)?;
        log::debug!("PUT {url}");
        let response = self
            .http
            .put(url)
            .json(patch)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, student_id: &str) -> Result<(), ApiError> {
        let url = self.student_url(student_id)?;
        log::debug!("DELETE {url}");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check_status(response).await?;
        Ok(())
    }
}
