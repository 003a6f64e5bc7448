use async_trait::async_trait;
use reqwest::{header::ACCEPT, multipart::Form, Client};
use serde::Deserialize;

/// Ordered multipart text fields for one submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn to_multipart(&self) -> Form {
        self.fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(name.clone(), value.clone()))
    }
}

/// What came back from the endpoint. `body` is only read for non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("submission task did not complete: {0}")]
    Aborted(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, payload: &FormPayload) -> Result<TransportResponse, TransportError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    errors: Option<Vec<ErrorDescriptor>>,
}

#[derive(Deserialize)]
struct ErrorDescriptor {
    message: Option<String>,
}

/// Pull the `errors[].message` strings out of a rejection body.
/// Returns None when the body is not JSON or carries no messages.
pub fn parse_error_messages(body: &str) -> Option<Vec<String>> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let messages: Vec<String> = parsed
        .errors?
        .into_iter()
        .filter_map(|error| error.message)
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages)
    }
}

/// Posts forms to a Formspree-style endpoint
#[derive(Clone)]
pub struct FormspreeClient {
    client: Client,
    endpoint: String,
}

impl FormspreeClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for FormspreeClient {
    async fn submit(&self, payload: &FormPayload) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .multipart(payload.to_multipart())
            .send()
            .await?;

        let status = response.status();
        let body = if status.is_success() {
            String::new()
        } else {
            // An unreadable body is treated like an unstructured rejection
            response.text().await.unwrap_or_default()
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
