use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, de::DeserializeOwned};

use crate::models::{MessageResponse, Movie, MovieInput, Page, UploadResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// A poster picked on the client, not yet uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self { name: name.into(), content_type: content_type.into(), bytes: bytes.into() }
    }

    /// Inline `data:` URL used as the local preview before anything is uploaded.
    pub fn data_url(&self) -> String {
        let encoded = general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.content_type)
    }
}

/// The movie HTTP surface as seen by the form and table.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn list(&self, page: Page) -> ClientResult<Vec<Movie>>;
    async fn create(&self, input: &MovieInput) -> ClientResult<Movie>;
    async fn update(&self, id: i32, input: &MovieInput) -> ClientResult<Movie>;
    async fn delete(&self, id: i32) -> ClientResult<()>;
    /// Returns the hosted image URL.
    async fn upload(&self, image: &ImageFile) -> ClientResult<String>;
}

#[derive(Clone, Debug)]
pub struct HttpMovieApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMovieApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody { details: Some(d), .. }) => d,
        Ok(ErrorBody { error: Some(e), .. }) => e,
        _ if !text.trim().is_empty() => text,
        _ => status.to_string(),
    };
    Err(ClientError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn list(&self, page: Page) -> ClientResult<Vec<Movie>> {
        let resp = self
            .client
            .get(self.url("/movies"))
            .query(&[("skip", page.skip), ("take", page.take)])
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create(&self, input: &MovieInput) -> ClientResult<Movie> {
        let resp = self.client.post(self.url("/movies")).json(input).send().await?;
        read_json(resp).await
    }

    async fn update(&self, id: i32, input: &MovieInput) -> ClientResult<Movie> {
        let resp = self.client.put(self.url(&format!("/movies/{id}"))).json(input).send().await?;
        read_json(resp).await
    }

    async fn delete(&self, id: i32) -> ClientResult<()> {
        let resp = self.client.delete(self.url(&format!("/movies/{id}"))).send().await?;
        let _: MessageResponse = read_json(resp).await?;
        Ok(())
    }

    async fn upload(&self, image: &ImageFile) -> ClientResult<String> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("image", part);

        let resp = self.client.post(self.url("/upload")).multipart(form).send().await?;
        let body: UploadResponse = read_json(resp).await?;
        Ok(body.image_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_a_base64_data_url() {
        let file = ImageFile::new("a.png", "image/png", Bytes::from_static(b"png"));
        assert_eq!(file.data_url(), "data:image/png;base64,cG5n");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpMovieApi::new(reqwest::Client::new(), "http://localhost:5000/");
        assert_eq!(api.url("/movies/3"), "http://localhost:5000/movies/3");
    }
}
