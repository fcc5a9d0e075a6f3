use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Html,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{
    AppState,
    client::TableView,
    error::{ApiError, ApiResult, Operation},
    media::ImageUpload,
    models::{DbInfo, MessageResponse, Movie, MovieInput, PageQuery, UploadResponse},
    templates,
};

const IMAGE_FIELD: &str = "image";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = PageQuery::default().resolve(state.config.max_page_size);
    let view = match state.movies.list(page).await {
        Ok(movies) => TableView::from_movies(movies.into_iter().map(Movie::from).collect()),
        Err(err) => {
            warn!(error = %err, "failed to load movies for index page");
            TableView::Error(crate::client::LOAD_ERROR.to_string())
        },
    };
    Html(templates::movies_page(&view))
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let no_file = || ApiError::BadRequest("No image file provided".to_string());
    let mut multipart = multipart.map_err(|_| no_file())?;

    let mut image = None;
    while let Some(field) =
        multipart.next_field().await.map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        // Text parts that happen to share the field name are not file selections.
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            continue;
        }
        image = Some(ImageUpload { file_name, content_type, bytes });
        break;
    }

    let Some(image) = image else {
        debug!("upload request without an image part");
        return Err(no_file());
    };

    info!(
        file_name = ?image.file_name,
        content_type = ?image.content_type,
        size = image.bytes.len(),
        host_configured = state.config.cloudinary.is_configured(),
        "uploading image"
    );

    let hosted = state.images.upload(image).await.map_err(ApiError::Upload)?;
    info!(public_id = ?hosted.public_id, "image uploaded");

    Ok(Json(UploadResponse { image_url: hosted.secure_url }))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let input = validated(body)?;
    let created =
        state.movies.create(input).await.map_err(ApiError::persistence(Operation::Create))?;
    debug!(id = created.id, "movie created");
    Ok(Json(created.into()))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let page = query.map(|Query(q)| q).unwrap_or_default().resolve(state.config.max_page_size);
    let movies = state.movies.list(page).await.map_err(ApiError::persistence(Operation::List))?;
    Ok(Json(movies.into_iter().map(Movie::from).collect()))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Movie>> {
    let id = parse_id(&id)?;
    let movie = state.movies.get(id).await.map_err(ApiError::persistence(Operation::Get))?;
    movie.map(|m| Json(m.into())).ok_or(ApiError::NotFound)
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let id = parse_id(&id)?;
    let input = validated(body)?;
    let updated =
        state.movies.update(id, input).await.map_err(ApiError::persistence(Operation::Update))?;
    Ok(Json(updated.into()))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.movies.delete(id).await.map_err(ApiError::persistence(Operation::Delete))?;
    debug!(id, "movie deleted");
    Ok(Json(MessageResponse { message: "Movie deleted".to_string() }))
}

pub async fn db_info(State(state): State<Arc<AppState>>) -> ApiResult<Json<DbInfo>> {
    let total_movies = state.movies.count().await.map_err(ApiError::persistence(Operation::Info))?;
    let recent = state.movies.recent().await.map_err(ApiError::persistence(Operation::Info))?;
    Ok(Json(DbInfo {
        total_movies,
        recent_movies: recent.into_iter().map(Movie::from).collect(),
        message: "Database connection successful".to_string(),
    }))
}

fn parse_id(raw: &str) -> ApiResult<i32> {
    raw.trim().parse().map_err(|_| ApiError::BadRequest("Invalid movie id".to_string()))
}

fn validated(body: Result<Json<MovieInput>, JsonRejection>) -> ApiResult<MovieInput> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    input.validate().map_err(ApiError::Invalid)?;
    Ok(input)
}
