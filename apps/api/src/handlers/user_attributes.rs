use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use blend_application::UserAttributeSyncer;
use blend_core::AppError;

use crate::dto::{UpdateUserAttributesRequest, UpdateUserAttributesResponse};
use crate::error::ApiResult;
use crate::request_headers::RequestCredentials;
use crate::state::AppState;

pub async fn update_user_attributes_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UpdateUserAttributesRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateUserAttributesResponse>> {
    let directory_credentials = RequestCredentials::from_headers(&headers)
        .directory(&state.credential_defaults)
        .ok_or_else(|| AppError::Validation("missing directory credentials".to_owned()))?;

    let Json(request) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let directory = state
        .directory_connector
        .connect(&directory_credentials)
        .await?;
    let summary = UserAttributeSyncer::new(directory)
        .sync(request.user_attribute.as_str(), request.update_type.into())
        .await?;

    Ok(Json(summary.into()))
}
