//! JSON routes over the query engine and the write path.
//!
//! Each request opens its own [`Store`] on a blocking worker, runs its
//! operation inside one transaction, and drops the store when it returns.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Form, FromRequest, Path, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

use crate::db::{Directory, Store};
use crate::error::DirectoryError;
use crate::forms::{ArtistForm, ShowForm, VenueForm};
use crate::query::{
    self, ArtistDetail, ArtistListItem, ArtistSummary, LocationGroup, SearchResults,
    ShowListing, VenueDetail, VenueSummary,
};

#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("worker task failed: {0}")]
    Task(#[from] JoinError),
}

/// `Json` extractor whose rejections use the [`ApiError`] envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Directory(DirectoryError::NotFound { kind, id }) => error_response(
                StatusCode::NOT_FOUND,
                json!({
                    "code": "not_found",
                    "message": format!("{kind} {id} not found"),
                }),
            ),
            ApiError::Directory(DirectoryError::Validation(errors)) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "code": "invalid_submission",
                    "message": "data submitted is not valid",
                    "fields": errors,
                }),
            ),
            ApiError::Body(rejection) => error_response(
                rejection.status(),
                json!({
                    "code": "invalid_body",
                    "message": rejection.body_text(),
                }),
            ),
            ApiError::Directory(DirectoryError::Storage(err)) => {
                tracing::error!(error = %err, "storage failure");
                internal_error()
            }
            ApiError::Task(err) => {
                tracing::error!(error = %err, "worker task failed");
                internal_error()
            }
        }
    }
}

fn error_response(status: StatusCode, error: serde_json::Value) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "code": "internal",
            "message": "an internal error occurred",
        }),
    )
}

/// Acknowledgement for a write, carrying the record id and a human message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Notice {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub search_term: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", get(search_venues).post(search_venues_form))
        .route("/venues/create", post(create_venue))
        .route("/venues/{id}", get(show_venue).delete(delete_venue))
        .route("/venues/{id}/edit", post(edit_venue))
        .route("/artists", get(list_artists))
        .route("/artists/search", get(search_artists).post(search_artists_form))
        .route("/artists/create", post(create_artist))
        .route("/artists/{id}", get(show_artist).delete(delete_artist))
        .route("/artists/{id}/edit", post(edit_artist))
        .route("/shows", get(list_shows))
        .route("/shows/create", post(create_show))
        .with_state(state)
}

async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Store) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let path = Arc::clone(&state.db_path);
    let result = tokio::task::spawn_blocking(move || -> crate::error::Result<T> {
        let store = Store::open(&path)?;
        store.in_transaction(op)
    })
    .await?;
    Ok(result?)
}

async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<LocationGroup>>, ApiError> {
    let now = Utc::now();
    let areas = with_store(&state, move |store| query::venues_by_location(store, now)).await?;
    Ok(Json(areas))
}

async fn search_venues(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<VenueSummary>>, ApiError> {
    run_venue_search(state, params.search_term).await
}

async fn search_venues_form(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Json<SearchResults<VenueSummary>>, ApiError> {
    run_venue_search(state, params.search_term).await
}

async fn run_venue_search(
    state: AppState,
    term: String,
) -> Result<Json<SearchResults<VenueSummary>>, ApiError> {
    let now = Utc::now();
    tracing::debug!(term = %term, "searching venues");
    let results = with_store(&state, move |store| query::search_venues(store, &term, now)).await?;
    Ok(Json(results))
}

async fn show_venue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VenueDetail>, ApiError> {
    let now = Utc::now();
    let venue = with_store(&state, move |store| query::venue_detail(store, id, now)).await?;
    Ok(Json(venue))
}

async fn create_venue(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<VenueForm>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    let venue = form.validate().map_err(DirectoryError::from)?;
    let name = venue.name.clone();
    let id = with_store(&state, move |store| store.insert_venue(&venue)).await?;
    tracing::info!(venue_id = id, "venue listed");
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            id,
            message: format!("Venue {name} was successfully listed!"),
        }),
    ))
}

async fn edit_venue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(form): JsonBody<VenueForm>,
) -> Result<Json<Notice>, ApiError> {
    let venue = form.validate().map_err(DirectoryError::from)?;
    let name = venue.name.clone();
    with_store(&state, move |store| store.update_venue(id, &venue)).await?;
    tracing::info!(venue_id = id, "venue updated");
    Ok(Json(Notice {
        id,
        message: format!("Venue {name} was successfully updated!"),
    }))
}

async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notice>, ApiError> {
    with_store(&state, move |store| store.delete_venue(id)).await?;
    tracing::info!(venue_id = id, "venue deleted");
    Ok(Json(Notice {
        id,
        message: format!("Venue {id} was deleted along with its shows."),
    }))
}

async fn list_artists(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArtistListItem>>, ApiError> {
    let artists = with_store(&state, |store| query::list_artists(store)).await?;
    Ok(Json(artists))
}

async fn search_artists(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults<ArtistSummary>>, ApiError> {
    run_artist_search(state, params.search_term).await
}

async fn search_artists_form(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Json<SearchResults<ArtistSummary>>, ApiError> {
    run_artist_search(state, params.search_term).await
}

async fn run_artist_search(
    state: AppState,
    term: String,
) -> Result<Json<SearchResults<ArtistSummary>>, ApiError> {
    let now = Utc::now();
    tracing::debug!(term = %term, "searching artists");
    let results =
        with_store(&state, move |store| query::search_artists(store, &term, now)).await?;
    Ok(Json(results))
}

async fn show_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let now = Utc::now();
    let artist = with_store(&state, move |store| query::artist_detail(store, id, now)).await?;
    Ok(Json(artist))
}

async fn create_artist(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ArtistForm>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    let artist = form.validate().map_err(DirectoryError::from)?;
    let name = artist.name.clone();
    let id = with_store(&state, move |store| store.insert_artist(&artist)).await?;
    tracing::info!(artist_id = id, "artist listed");
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            id,
            message: format!("Artist {name} was successfully listed!"),
        }),
    ))
}

async fn edit_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(form): JsonBody<ArtistForm>,
) -> Result<Json<Notice>, ApiError> {
    let artist = form.validate().map_err(DirectoryError::from)?;
    let name = artist.name.clone();
    with_store(&state, move |store| store.update_artist(id, &artist)).await?;
    tracing::info!(artist_id = id, "artist updated");
    Ok(Json(Notice {
        id,
        message: format!("Artist {name} was successfully updated!"),
    }))
}

async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notice>, ApiError> {
    with_store(&state, move |store| store.delete_artist(id)).await?;
    tracing::info!(artist_id = id, "artist deleted");
    Ok(Json(Notice {
        id,
        message: format!("Artist {id} was deleted along with its shows."),
    }))
}

async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<ShowListing>>, ApiError> {
    let shows = with_store(&state, |store| query::list_shows(store)).await?;
    Ok(Json(shows))
}

async fn create_show(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ShowForm>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    let show = form.validate().map_err(DirectoryError::from)?;
    let id = with_store(&state, move |store| store.insert_show(&show)).await?;
    tracing::info!(show_id = id, "show listed");
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            id,
            message: "Show was successfully listed!".to_string(),
        }),
    ))
}
