use axum::http::StatusCode;
use noted_core::{validate_id, Filter, FindMany, FindOne, Note, Store};
use std::sync::MutexGuard;

use crate::envelope::{wrap, ApiResponse};
use crate::errors::{RestError, RestResult};
use crate::model::note::{CreateNoteRequest, NotePage, NoteResponse};
use crate::state::AppState;

/// Use cases for the notes collection. Thin by design: each one is a
/// repository call funneled through the envelope builder.

pub fn create(state: &AppState, request: CreateNoteRequest) -> ApiResponse<NoteResponse> {
    wrap(
        create_note(state, request),
        "Note created successfully",
        StatusCode::CREATED,
    )
}

pub fn find_all(state: &AppState, query: FindMany) -> ApiResponse<NotePage> {
    wrap(list_notes(state, query), "Notes loaded successfully", StatusCode::OK)
}

pub fn find_one(state: &AppState, id: &str, query: FindOne) -> ApiResponse<NoteResponse> {
    wrap(get_note(state, id, query), "Note loaded successfully", StatusCode::OK)
}

pub fn remove(state: &AppState, id: &str) -> ApiResponse<()> {
    wrap(
        delete_note(state, id),
        "Note deleted successfully",
        StatusCode::NO_CONTENT,
    )
}

fn create_note(state: &AppState, request: CreateNoteRequest) -> RestResult<NoteResponse> {
    let store = lock_store(state)?;
    let doc = store.collection::<Note>().create(request.into())?;
    Ok(doc.into())
}

fn list_notes(state: &AppState, query: FindMany) -> RestResult<NotePage> {
    let store = lock_store(state)?;
    let page = store
        .collection::<Note>()
        .find_many_with_pagination(&Filter::new(), &query)?;
    Ok(page.into())
}

fn get_note(state: &AppState, id: &str, query: FindOne) -> RestResult<NoteResponse> {
    let store = lock_store(state)?;
    let doc = store
        .collection::<Note>()
        .find_by_id(id, &query.populate)?
        .ok_or_else(|| not_found(id))?;
    Ok(doc.into())
}

fn delete_note(state: &AppState, id: &str) -> RestResult<()> {
    validate_id(id)?;
    let store = lock_store(state)?;
    store
        .collection::<Note>()
        .find_one_and_delete(&Filter::new().id(id))?
        .ok_or_else(|| not_found(id))?;
    Ok(())
}

fn not_found(id: &str) -> RestError {
    RestError::NotFound(format!("Note with ID {} not found", id))
}

fn lock_store(state: &AppState) -> RestResult<MutexGuard<'_, Store>> {
    state
        .store
        .lock()
        .map_err(|_| RestError::Internal("store lock poisoned".to_string()))
}
