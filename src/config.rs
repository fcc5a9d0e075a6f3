use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub cloudinary: CloudinaryConfig,
    pub max_upload_bytes: usize,
    pub max_page_size: u64,
}

#[derive(Clone, Debug, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub folder: String,
    pub signature_algorithm: SignatureAlgorithm,
}

/// Digest the image host expects on signed requests. Accounts sign with SHA-1
/// unless switched over in their security settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Some(SignatureAlgorithm::Sha1),
            "sha256" | "sha-256" => Some(SignatureAlgorithm::Sha256),
            _ => None,
        }
    }
}

impl CloudinaryConfig {
    pub fn is_configured(&self) -> bool {
        [&self.cloud_name, &self.api_key, &self.api_secret].iter().all(|v| !v.trim().is_empty())
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "5000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://marquee.db?mode=rwc".to_string());

        let cloudinary = CloudinaryConfig {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: std::env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            base_url: std::env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
            folder: std::env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "movies".to_string()),
            signature_algorithm: match std::env::var("CLOUDINARY_SIGNATURE_ALGORITHM") {
                Ok(raw) => SignatureAlgorithm::parse(&raw)
                    .with_context(|| format!("CLOUDINARY_SIGNATURE_ALGORITHM: {raw}"))?,
                Err(_) => SignatureAlgorithm::default(),
            },
        };

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024);

        let max_page_size: u64 =
            std::env::var("MAX_PAGE_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(100);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            cloudinary,
            max_upload_bytes,
            max_page_size,
        })
    }

    /// Settings for tests and embedded use: in-memory database, no image host.
    pub fn in_memory() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: "sqlite::memory:".to_string(),
            cloudinary: CloudinaryConfig {
                base_url: "https://api.cloudinary.com/v1_1".to_string(),
                folder: "movies".to_string(),
                ..Default::default()
            },
            max_upload_bytes: 10 * 1024 * 1024,
            max_page_size: 100,
        }
    }
}
