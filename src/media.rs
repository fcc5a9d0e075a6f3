//! Media upload gateway: forwards a single poster image to the hosting service
//! and hands back the public URL. Nothing here retries, and hosted assets are
//! never cleaned up when their movie goes away.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::config::{CloudinaryConfig, SignatureAlgorithm};

/// One image as received from the client.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostedImage {
    pub public_id: Option<String>,
    pub secure_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("image host credentials are not configured")]
    NotConfigured,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("image host response did not include a secure URL")]
    MissingUrl,
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<HostedImage, UploadError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crop {
    /// Shrink to fit inside the box, never upscale or crop.
    Limit,
}

impl Crop {
    fn as_code(self) -> &'static str {
        match self {
            Crop::Limit => "limit",
        }
    }
}

/// Incoming transformation applied by the host before storing the asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transformation {
    pub width: u32,
    pub height: u32,
    pub crop: Crop,
    pub quality: &'static str,
    pub format: &'static str,
}

impl Transformation {
    pub const POSTER: Self =
        Self { width: 400, height: 600, crop: Crop::Limit, quality: "auto", format: "auto" };

    pub fn to_param(&self) -> String {
        format!(
            "c_{},h_{},w_{}/q_{}/f_{}",
            self.crop.as_code(),
            self.height,
            self.width,
            self.quality,
            self.format
        )
    }
}

pub struct CloudinaryClient {
    client: reqwest::Client,
    config: CloudinaryConfig,
    transformation: Transformation,
}

impl CloudinaryClient {
    pub fn new(client: reqwest::Client, config: &CloudinaryConfig) -> Self {
        if !config.is_configured() {
            tracing::warn!("image host credentials missing; uploads will fail");
        }

        Self { client, config: config.clone(), transformation: Transformation::POSTER }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Parameters covered by the request signature, sorted by name.
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.to_string()),
            ("transformation", self.transformation.to_param()),
        ]
    }
}

pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&")
}

/// Hex digest of the sorted params with the API secret appended.
pub fn sign(params: &[(&str, String)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let payload = format!("{}{api_secret}", string_to_sign(params));
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(&self, image: ImageUpload) -> Result<HostedImage, UploadError> {
        if !self.config.is_configured() {
            return Err(UploadError::NotConfigured);
        }

        let timestamp = jiff::Timestamp::now().as_second();
        let params = self.signed_params(timestamp);
        let signature = sign(&params, &self.config.api_secret, self.config.signature_algorithm);

        let mut file = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(ct) = image.content_type.as_deref() {
            file = file.mime_str(ct)?;
        }

        let mut form =
            Form::new().part("file", file).text("api_key", self.config.api_key.clone());
        for (k, v) in params {
            form = form.text(k, v);
        }
        form = form.text("signature", signature);

        let resp = self.client.post(self.upload_url()).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() { status.to_string() } else { body }
                });
            return Err(UploadError::Rejected { status: status.as_u16(), message });
        }

        let result: UploadResult = resp.json().await?;
        let secure_url = result.secure_url.ok_or(UploadError::MissingUrl)?;
        tracing::debug!(public_id = ?result.public_id, "image host accepted upload");
        Ok(HostedImage { public_id: result.public_id, secure_url })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, extract::Multipart, http::StatusCode, routing::post};
    use serde_json::json;

    use super::*;

    fn config(base_url: String) -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
            base_url,
            folder: "movies".into(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }

    fn poster() -> ImageUpload {
        ImageUpload {
            file_name: Some("dune.jpg".into()),
            content_type: Some("image/jpeg".into()),
            bytes: Bytes::from_static(b"\xff\xd8\xff\xe0fake-jpeg"),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn poster_transformation_limits_without_cropping() {
        assert_eq!(Transformation::POSTER.to_param(), "c_limit,h_600,w_400/q_auto/f_auto");
    }

    #[test]
    fn string_to_sign_sorts_and_skips_empty_values() {
        let params = [
            ("timestamp", "1315060510".to_string()),
            ("folder", "movies".to_string()),
            ("eager", String::new()),
        ];
        assert_eq!(string_to_sign(&params), "folder=movies&timestamp=1315060510");
    }

    #[test]
    fn sha1_signature_matches_documented_example() {
        let params = [
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample_image".to_string()),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ];
        assert_eq!(
            sign(&params, "abcd", SignatureAlgorithm::Sha1),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn signature_algorithm_selects_digest() {
        assert_eq!(
            sign(&[], "abc", SignatureAlgorithm::Sha1),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            sign(&[], "abc", SignatureAlgorithm::Sha256),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn signature_depends_on_secret() {
        let params = [("timestamp", "1".to_string())];
        let a = sign(&params, "one", SignatureAlgorithm::Sha1);
        let b = sign(&params, "two", SignatureAlgorithm::Sha1);
        assert_eq!(a.len(), 40);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unconfigured_host_fails_without_network() {
        let mut cfg = config("http://127.0.0.1:9".into());
        cfg.api_secret.clear();
        let host = CloudinaryClient::new(reqwest::Client::new(), &cfg);
        assert!(matches!(host.upload(poster()).await, Err(UploadError::NotConfigured)));
    }

    #[tokio::test]
    async fn upload_sends_signed_form_and_returns_secure_url() {
        let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::default();
        let sink = seen.clone();
        let app = Router::new().route(
            "/demo/image/upload",
            post(move |mut multipart: Multipart| {
                let sink = sink.clone();
                async move {
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let value = if name == "file" {
                            field.file_name().unwrap_or_default().to_string()
                        } else {
                            field.text().await.unwrap()
                        };
                        sink.lock().unwrap().push((name, value));
                    }
                    Json(json!({
                        "public_id": "movies/abc",
                        "secure_url": "https://res.cloudinary.com/demo/image/upload/movies/abc.jpg",
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let host = CloudinaryClient::new(reqwest::Client::new(), &config(base));
        let hosted = host.upload(poster()).await.unwrap();

        assert_eq!(
            hosted.secure_url,
            "https://res.cloudinary.com/demo/image/upload/movies/abc.jpg"
        );
        assert_eq!(hosted.public_id.as_deref(), Some("movies/abc"));

        let fields = seen.lock().unwrap().clone();
        let get = |k: &str| fields.iter().find(|(n, _)| n == k).map(|(_, v)| v.clone());
        assert_eq!(get("file").as_deref(), Some("dune.jpg"));
        assert_eq!(get("folder").as_deref(), Some("movies"));
        assert_eq!(get("transformation").as_deref(), Some("c_limit,h_600,w_400/q_auto/f_auto"));
        assert_eq!(get("api_key").as_deref(), Some("key"));

        let timestamp = get("timestamp").unwrap();
        let expected = sign(
            &[
                ("folder", "movies".to_string()),
                ("timestamp", timestamp),
                ("transformation", Transformation::POSTER.to_param()),
            ],
            "secret",
            SignatureAlgorithm::Sha1,
        );
        assert_eq!(expected.len(), 40);
        assert_eq!(get("signature"), Some(expected));
    }

    #[tokio::test]
    async fn upstream_error_message_is_preserved() {
        let app = Router::new().route(
            "/demo/image/upload",
            post(|| async {
                let body = json!({ "error": { "message": "Invalid Signature" } });
                (StatusCode::UNAUTHORIZED, Json(body))
            }),
        );
        let base = serve(app).await;

        let host = CloudinaryClient::new(reqwest::Client::new(), &config(base));
        match host.upload(poster()).await {
            Err(UploadError::Rejected { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
