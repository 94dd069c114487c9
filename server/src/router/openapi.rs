use std::sync::Arc;

use aide::{
    axum::{routing::get, ApiRouter, IntoApiResponse},
    openapi::OpenApi,
    redoc::Redoc,
    transform::TransformOpenApi,
};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Extension, Json,
};
use base64::Engine;

use crate::state::{AppState, DocsAuth};

pub fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    api.title("Noted API")
        .summary("CRUD API for notes with pagination and filtering")
        .description("Every response carries the uniform success/error envelope.")
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
    Json(api).into_response()
}

/// Documentation routes. Excluded from the generated API; guarded by Basic
/// auth when credentials are configured.
pub fn docs_routes(app_state: AppState) -> ApiRouter<AppState> {
    ApiRouter::new()
        .route(
            "/docs",
            Redoc::new("/docs/private/api.json")
                .with_title("Noted API")
                .axum_route(),
        )
        .route("/docs/private/api.json", get(serve_docs))
        .layer(middleware::from_fn_with_state(app_state, require_docs_auth))
}

async fn require_docs_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if authorized(state.docs_auth.as_ref(), header_value) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"docs\"")],
        )
            .into_response()
    }
}

fn authorized(auth: Option<&DocsAuth>, header_value: Option<&str>) -> bool {
    let Some(auth) = auth else {
        // No credentials configured, docs are open
        return true;
    };
    let Some(value) = header_value else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(text) = String::from_utf8(decoded) else {
        return false;
    };
    match text.split_once(':') {
        Some((user, password)) => user == auth.user && password == auth.password,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn creds() -> DocsAuth {
        DocsAuth {
            user: "docs".to_string(),
            password: "secret".to_string(),
        }
    }

    fn basic(user_pass: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(user_pass)
        )
    }

    #[test]
    fn test_open_when_unconfigured() {
        assert!(authorized(None, None));
    }

    #[test]
    fn test_accepts_matching_credentials() {
        let auth = creds();
        assert!(authorized(Some(&auth), Some(&basic("docs:secret"))));
    }

    #[test]
    fn test_rejects_bad_or_missing_credentials() {
        let auth = creds();
        assert!(!authorized(Some(&auth), None));
        assert!(!authorized(Some(&auth), Some("Bearer token")));
        assert!(!authorized(Some(&auth), Some(&basic("docs:wrong"))));
        assert!(!authorized(Some(&auth), Some(&basic("no-colon"))));
        assert!(!authorized(Some(&auth), Some("Basic not-base64!")));
    }
}
