use std::sync::Arc;

use marquee::{
    AppState, config::Config, db, media::CloudinaryClient, repository::MovieRepository, router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,marquee=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("marquee/0.1")
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let images = CloudinaryClient::new(http, &config.cloudinary);

    let state = Arc::new(AppState {
        config: config.clone(),
        movies: MovieRepository::new(db),
        images: Arc::new(images),
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
