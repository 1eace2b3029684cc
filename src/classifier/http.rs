//! HTTP client for the handwriting classifier.
//!
//! The classifier takes the encoded payload as the whole POST body and answers
//! with its ranked guesses. Configuration is via [`Config`](crate::config::Config)
//! or the `TEXIFY_CLASSIFIER_URL` environment variable.

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinSet};

use super::{ClassifierClient, ClassifierError};
use crate::config::Config;
use crate::encode::Payload;

/// Public detexify endpoint.
pub const DEFAULT_CLASSIFIER_URL: &str = "http://detexify.kirelabs.org/api/classify";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A classifier answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: u16,
    /// Raw response body, usually a JSON list of candidate symbols.
    pub body: String,
}

/// Receives the outcome of each submission once its task has finished.
pub type AnswerHandler = Box<dyn FnMut(Result<Classification, ClassifierError>) + Send>;

/// HTTP client for the classifier service.
///
/// [`ClassifierClient::submit`] spawns the request on the runtime the client
/// was created on and returns at once. Finished requests are collected on the
/// next submit, by [`HttpClassifier::reap`] or by [`HttpClassifier::drain`],
/// and handed to the [`HttpClassifier::on_answer`] handler.
pub struct HttpClassifier {
    url: String,
    client: Client,
    runtime: Handle,
    in_flight: JoinSet<Result<Classification, ClassifierError>>,
    on_answer: Option<AnswerHandler>,
}

impl HttpClassifier {
    /// Create a client for `url` bound to the current tokio runtime.
    pub fn new(url: impl Into<String>) -> Result<Self, ClassifierError> {
        Self::with_client(url, Client::new())
    }

    /// Create a client using the URL and timeout from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Self::with_client(config.classifier_url.clone(), client)
    }

    fn with_client(url: impl Into<String>, client: Client) -> Result<Self, ClassifierError> {
        Ok(Self {
            url: url.into(),
            client,
            runtime: Handle::try_current()?,
            in_flight: JoinSet::new(),
            on_answer: None,
        })
    }

    /// Deliver every collected answer to `handler`. Without a handler answers
    /// are only logged.
    pub fn on_answer(
        mut self,
        handler: impl FnMut(Result<Classification, ClassifierError>) + Send + 'static,
    ) -> Self {
        self.on_answer = Some(Box::new(handler));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of submissions not yet collected.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Send `payload` and wait for the answer.
    pub async fn classify(&self, payload: &Payload) -> Result<Classification, ClassifierError> {
        send(&self.client, &self.url, payload.as_str().to_owned()).await
    }

    /// Collect the submissions that have already finished without waiting.
    /// Returns how many were collected.
    pub fn reap(&mut self) -> usize {
        let mut reaped = 0;
        while let Some(joined) = self.in_flight.try_join_next() {
            self.deliver(joined);
            reaped += 1;
        }
        if reaped > 0 {
            tracing::debug!(reaped, pending = self.in_flight.len(), "collected finished submissions");
        }
        reaped
    }

    /// Wait for every outstanding submission. Returns how many were collected.
    pub async fn drain(&mut self) -> usize {
        let mut drained = 0;
        while let Some(joined) = self.in_flight.join_next().await {
            self.deliver(joined);
            drained += 1;
        }
        drained
    }

    fn deliver(&mut self, joined: Result<Result<Classification, ClassifierError>, JoinError>) {
        let result = joined.unwrap_or_else(|e| {
            tracing::warn!("Classifier task failed: {}", e);
            Err(e.into())
        });
        if let Some(handler) = self.on_answer.as_mut() {
            handler(result);
        }
    }
}

impl fmt::Debug for HttpClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClassifier")
            .field("url", &self.url)
            .field("pending", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl ClassifierClient for HttpClassifier {
    fn submit(&mut self, payload: Payload) -> Result<(), ClassifierError> {
        self.reap();
        let client = self.client.clone();
        let url = self.url.clone();
        let len = payload.len();
        self.in_flight.spawn_on(
            async move {
                let result = send(&client, &url, payload.into_string()).await;
                match &result {
                    Ok(answer) => tracing::info!(status = answer.status, "classifier answered"),
                    Err(e) => tracing::warn!("Classifier request failed: {}", e),
                }
                result
            },
            &self.runtime,
        );
        tracing::debug!(bytes = len, url = %self.url, "payload dispatched");
        Ok(())
    }
}

async fn send(client: &Client, url: &str, body: String) -> Result<Classification, ClassifierError> {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(body)
        .send()
        .await?;
    handle_response(response).await
}

/// Handle response, converting HTTP errors to ClassifierError.
async fn handle_response(response: reqwest::Response) -> Result<Classification, ClassifierError> {
    let status = response.status();
    if status.is_success() {
        Ok(Classification {
            status: status.as_u16(),
            body: response.text().await?,
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(ClassifierError::NotFound(body)),
            StatusCode::BAD_REQUEST => Err(ClassifierError::BadRequest(body)),
            _ => Err(ClassifierError::Server(format!("{}: {}", status, body))),
        }
    }
}
