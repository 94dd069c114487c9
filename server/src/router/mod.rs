use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod notes;
pub mod openapi;

pub fn setup_router(app_state: AppState) -> Router {
    aide::gen::on_error(|error| {
        println!("{error}");
    });

    aide::gen::extract_schemas(true);
    let mut api = OpenApi::default();

    ApiRouter::new()
        .merge(health::health_routes(app_state.clone()))
        .merge(notes::notes_routes(app_state.clone()))
        .merge(openapi::docs_routes(app_state.clone()))
        .finish_api_with(&mut api, openapi::api_docs)
        .layer(Extension(Arc::new(api)))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
