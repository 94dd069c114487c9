use aide::{gen::GenContext, openapi::Operation, OperationInput};
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::envelope::ApiResponse;

/// JSON body extractor whose rejections wear the response envelope.
///
/// A malformed or mistyped body would otherwise surface as axum's
/// plain-text rejection; this keeps framework errors on the same wire
/// shape as service errors.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiResponse::<()>::error(
                rejection.status(),
                rejection.body_text(),
            )
            .into_response()),
        }
    }
}

impl<T: JsonSchema> OperationInput for ApiJson<T> {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        Json::<T>::operation_input(ctx, operation);
    }
}

/// Query-string extractor whose rejections wear the response envelope.
/// Built on `axum_extra`'s `Query` so repeated parameters keep working.
pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum_extra::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum_extra::extract::Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiResponse::<()>::error(
                axum::http::StatusCode::BAD_REQUEST,
                format!("Failed to deserialize query string: {rejection}"),
            )
            .into_response()),
        }
    }
}

impl<T: JsonSchema> OperationInput for ApiQuery<T> {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        axum_extra::extract::Query::<T>::operation_input(ctx, operation);
    }
}
