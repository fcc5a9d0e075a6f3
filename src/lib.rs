pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod media;
pub mod models;
pub mod repository;
pub mod routes;
pub mod templates;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, media::ImageHost, repository::MovieRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: MovieRepository,
    pub images: Arc<dyn ImageHost>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/upload", post(routes::upload).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .route("/db-info", get(routes::db_info))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
