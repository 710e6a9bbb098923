//! Classification client
//!
//! Adapter for the hosted litter-severity model. The service scores a stored
//! image on a 1-10 scale; scores map into the ordered category set via
//! [`Severity::from_score`]. The model can be slow or unreliable, so every
//! call runs under the configured timeout and failures surface as retryable
//! errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::db::models::Severity;

/// Top of the scoring scale the service is asked to use
const SCORE_SCALE_MAX: u8 = 10;

/// Classifier errors (retryable)
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classification request failed: {0}")]
    Request(String),

    #[error("classifier returned status {0}")]
    Status(u16),

    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

/// Seam for the external classification service; tests supply fakes.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the image behind a stored, publicly reachable URL
    async fn classify(&self, image_url: &str) -> Result<Severity, ClassifierError>;
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    image_url: &'a str,
    scale_max: u8,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    /// 1-10 litter severity score; absent when the model could not decide
    severity: Option<u8>,
}

/// Hosted-model classification client
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpClassifier {
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image_url: &str) -> Result<Severity, ClassifierError> {
        let url = format!("{}/classify", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ClassifyRequest {
                image_url,
                scale_max: SCORE_SCALE_MAX,
            })
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClassifierError::Status(resp.status().as_u16()));
        }

        let body: ClassifyResponse = resp
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let score = body
            .severity
            .ok_or_else(|| ClassifierError::Malformed("no severity in response".to_string()))?;

        Severity::from_score(score).ok_or_else(|| {
            ClassifierError::Malformed(format!("severity score {} out of range", score))
        })
    }
}
