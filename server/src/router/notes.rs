use aide::{
    axum::{
        routing::{get_with, post_with},
        ApiRouter, IntoApiResponse,
    },
    transform::TransformOperation,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use noted_core::{FindMany, FindOne};

use crate::{
    envelope::ApiResponse,
    extract::{ApiJson, ApiQuery},
    model::note::{CreateNoteRequest, NotePage, NoteResponse},
    service,
    state::AppState,
};

async fn create_note(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateNoteRequest>,
) -> impl IntoApiResponse {
    service::create(&state, request).into_response()
}

fn create_note_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create a new note")
        .description("Creates a note; title and content must be non-empty.")
        .tag("Notes")
        .response::<201, Json<ApiResponse<NoteResponse>>>()
        .response_with::<400, Json<ApiResponse<NoteResponse>>, _>(|res| {
            res.description("Validation failed")
        })
}

async fn find_all_notes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FindMany>,
) -> impl IntoApiResponse {
    service::find_all(&state, query).into_response()
}

fn find_all_notes_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Retrieve all notes with pagination")
        .description(
            "Supports search, sort (leading '-' for descending), populate, \
             offset/page, limit, and period/from/to date filtering.",
        )
        .tag("Notes")
        .response::<200, Json<ApiResponse<NotePage>>>()
}

async fn find_one_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<FindOne>,
) -> impl IntoApiResponse {
    service::find_one(&state, &id, query).into_response()
}

fn find_one_note_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Retrieve a single note by ID")
        .tag("Notes")
        .response::<200, Json<ApiResponse<NoteResponse>>>()
        .response_with::<404, Json<ApiResponse<NoteResponse>>, _>(|res| {
            res.description("No note with that ID")
        })
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoApiResponse {
    service::remove(&state, &id).into_response()
}

fn delete_note_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete a note by ID")
        .tag("Notes")
        .response_with::<204, (), _>(|res| res.description("Note deleted"))
        .response_with::<404, Json<ApiResponse<NoteResponse>>, _>(|res| {
            res.description("No note with that ID")
        })
}

pub fn notes_routes(_app_state: AppState) -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route(
            "/notes",
            post_with(create_note, create_note_docs).get_with(find_all_notes, find_all_notes_docs),
        )
        .api_route(
            "/notes/:id",
            get_with(find_one_note, find_one_note_docs).delete_with(delete_note, delete_note_docs),
        )
}
