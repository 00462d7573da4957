use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::NetworkError;
use crate::recognition::domain::enrollment_client::EnrollmentClient;
use crate::recognition::domain::recognition_client::RecognitionClient;
use crate::shared::constants::{ADD_USER_PATH, RECOGNIZE_PATH};
use crate::shared::encoded_crop::EncodedCrop;
use crate::shared::identity::IdentityLabel;

const JPEG_MIME: &str = "image/jpeg";

#[derive(Deserialize)]
struct RecognizeResponse {
    name: Option<String>,
}

/// Blocking HTTP client for the remote recognition service.
///
/// `POST /recognize` takes one multipart file field `file` and answers
/// `{"name": "..."}`. `POST /add_user` takes a `name` text field plus one
/// `file` part per sample. Every request is bounded by the configured
/// timeout.
#[derive(Clone)]
pub struct HttpFaceService {
    client: Client,
    recognize_url: String,
    add_user_url: String,
}

impl HttpFaceService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let base = base_url.trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| NetworkError::Transport {
                endpoint: base.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            recognize_url: format!("{base}{RECOGNIZE_PATH}"),
            add_user_url: format!("{base}{ADD_USER_PATH}"),
        })
    }

    pub fn recognize_url(&self) -> &str {
        &self.recognize_url
    }

    pub fn add_user_url(&self) -> &str {
        &self.add_user_url
    }

    fn jpeg_part(crop: &EncodedCrop, file_name: String, endpoint: &str) -> Result<Part, NetworkError> {
        Part::bytes(crop.bytes().to_vec())
            .file_name(file_name)
            .mime_str(JPEG_MIME)
            .map_err(|source| NetworkError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    fn post(&self, endpoint: &str, form: Form) -> Result<reqwest::blocking::Response, NetworkError> {
        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .map_err(|source| NetworkError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl RecognitionClient for HttpFaceService {
    fn recognize(&self, crop: &EncodedCrop) -> Result<IdentityLabel, NetworkError> {
        let endpoint = self.recognize_url.as_str();
        debug!("Sending {} byte crop to {endpoint}", crop.len());
        let form = Form::new().part("file", Self::jpeg_part(crop, "file".into(), endpoint)?);
        let body: RecognizeResponse = self
            .post(endpoint, form)?
            .json()
            .map_err(|source| NetworkError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(IdentityLabel::from_server(body.name))
    }
}

impl EnrollmentClient for HttpFaceService {
    fn enroll(
        &self,
        name: &str,
        crops: &[EncodedCrop],
    ) -> Result<serde_json::Value, NetworkError> {
        let endpoint = self.add_user_url.as_str();
        info!("Enrolling {name:?} with {} samples via {endpoint}", crops.len());
        let mut form = Form::new().text("name", name.to_string());
        for (i, crop) in crops.iter().enumerate() {
            form = form.part("file", Self::jpeg_part(crop, format!("image_{i}.jpg"), endpoint)?);
        }
        let text = self
            .post(endpoint, form)?
            .text()
            .map_err(|source| NetworkError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
        // The body is informational; keep non-JSON replies as plain text.
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}
