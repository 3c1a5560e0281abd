use super::error::StoreError;
use super::geometry::Submission;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use serde_json::to_vec;
use std::time::Duration;

pub const POLYGON_PATH: &str = "api/v1/polygon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreResponse {
    pub status: u16,
}

impl StoreResponse {
    pub fn is_created(&self) -> bool {
        self.status == StatusCode::CREATED.as_u16()
    }
}

/// Remote persistence for submitted shapes.
#[async_trait]
pub trait ShapeStore {
    async fn create(&self, submission: &Submission) -> Result<StoreResponse, StoreError>;
}

#[derive(Debug)]
pub struct HttpShapeStore {
    client: Client,
    url: Url,
}

impl HttpShapeStore {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, StoreError> {
        let url = polygon_url(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Client)?;
        Ok(HttpShapeStore { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Resolves the polygon resource below a backend base url.
pub fn polygon_url(endpoint: &str) -> Result<Url, StoreError> {
    let invalid = |reason: String| StoreError::InvalidEndpoint {
        url: endpoint.to_string(),
        reason,
    };
    let mut base = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match base.scheme() {
        "http" | "https" => (),
        scheme => return Err(invalid(format!("unsupported scheme {}", scheme))),
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(POLYGON_PATH).map_err(|e| invalid(e.to_string()))
}

#[async_trait]
impl ShapeStore for HttpShapeStore {
    async fn create(&self, submission: &Submission) -> Result<StoreResponse, StoreError> {
        let body = to_vec(submission)?;
        info!(
            "posting '{}' with {} shape(s) to {}",
            submission.name,
            submission.coordinates.len(),
            self.url
        );
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(StoreError::Transport)?;
        let status = response.status();
        debug!("response status {}", status);
        Ok(StoreResponse {
            status: status.as_u16(),
        })
    }
}
