use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use supernote_core::models::lenient;
use supernote_core::{Note, NoteDraft, NotePatch, NoteService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::body::RequestBody;
use crate::error::AppError;

const NOTES_RETRIEVED: &str = "Notes retrieved successfully!";
const FAILED_TO_RETRIEVE: &str = "Failed to retrieve notes";
const FAILED_TO_CREATE: &str = "Failed to create note";
const FAILED_TO_UPDATE: &str = "Failed to update note";
const FAILED_TO_DELETE: &str = "Failed to delete note";

#[derive(Clone)]
pub struct AppState {
    notes: NoteService,
}

impl AppState {
    pub const fn new(notes: NoteService) -> Self {
        Self { notes }
    }
}

pub fn app_router(state: AppState) -> Router {
    let note_routes = Router::new()
        .route("/getAllNotes", get(list_all_notes))
        .route("/add", post(create_note))
        .route("/getNotesByUserId/{user_id}", get(list_notes_by_user))
        .route("/updateNoteById/{user_id}/{note_id}", patch(update_note))
        .route(
            "/deleteNoteById/{user_id}/{note_id}",
            patch(soft_delete_note).delete(hard_delete_note),
        );

    Router::new()
        .route("/", get(api_status))
        .nest("/notes", note_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct NoteListResponse {
    message: &'static str,
    notes: Vec<Note>,
}

#[derive(Debug, Serialize)]
struct NoteResponse {
    message: &'static str,
    note: Note,
}

/// Body of `getNotesByUserId`; the owner comes from here, not the path.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserFilter {
    #[serde(deserialize_with = "lenient::text")]
    user_id: Option<String>,
}

async fn api_status() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Api working",
    })
}

async fn list_all_notes(
    State(state): State<AppState>,
) -> Result<Json<NoteListResponse>, AppError> {
    let notes = state
        .notes
        .list_all()
        .await
        .map_err(AppError::store(FAILED_TO_RETRIEVE))?;
    tracing::info!(endpoint = "get_all_notes", count = notes.len(), "Listed notes");
    Ok(Json(NoteListResponse {
        message: NOTES_RETRIEVED,
        notes,
    }))
}

async fn create_note(
    State(state): State<AppState>,
    RequestBody(draft): RequestBody<NoteDraft>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state
        .notes
        .create(draft)
        .await
        .map_err(AppError::store(FAILED_TO_CREATE))?;
    tracing::info!(endpoint = "add", note_id = %note.id, "Created note");
    Ok(Json(NoteResponse {
        message: "Note created successfully!",
        note,
    }))
}

// The path segment is accepted but ignored; clients have always sent the owner in the body.
async fn list_notes_by_user(
    State(state): State<AppState>,
    Path(path_user_id): Path<String>,
    RequestBody(filter): RequestBody<UserFilter>,
) -> Result<Json<NoteListResponse>, AppError> {
    let notes = match filter.user_id {
        Some(user_id) => state
            .notes
            .list_by_user(&user_id)
            .await
            .map_err(AppError::store(FAILED_TO_RETRIEVE))?,
        None => Vec::new(),
    };
    tracing::info!(
        endpoint = "get_notes_by_user_id",
        path_user_id = %path_user_id,
        count = notes.len(),
        "Listed notes for user"
    );
    Ok(Json(NoteListResponse {
        message: NOTES_RETRIEVED,
        notes,
    }))
}

async fn update_note(
    State(state): State<AppState>,
    Path((user_id, note_id)): Path<(String, String)>,
    RequestBody(changes): RequestBody<NotePatch>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state
        .notes
        .update_by_id(&user_id, &note_id, changes)
        .await
        .map_err(AppError::store(FAILED_TO_UPDATE))?;
    tracing::info!(endpoint = "update_note_by_id", note_id = %note.id, "Updated note");
    Ok(Json(NoteResponse {
        message: "Note updated successfully!",
        note,
    }))
}

async fn soft_delete_note(
    State(state): State<AppState>,
    Path((user_id, note_id)): Path<(String, String)>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state
        .notes
        .soft_delete_by_id(&user_id, &note_id)
        .await
        .map_err(AppError::store(FAILED_TO_DELETE))?;
    tracing::info!(endpoint = "soft_delete_note_by_id", note_id = %note.id, "Soft-deleted note");
    Ok(Json(NoteResponse {
        message: "Note successfully soft-deleted",
        note,
    }))
}

async fn hard_delete_note(
    State(state): State<AppState>,
    Path((user_id, note_id)): Path<(String, String)>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state
        .notes
        .hard_delete_by_id(&user_id, &note_id)
        .await
        .map_err(AppError::store(FAILED_TO_DELETE))?;
    tracing::info!(endpoint = "delete_note_by_id", note_id = %note.id, "Deleted note");
    Ok(Json(NoteResponse {
        message: "Note successfully deleted",
        note,
    }))
}
