use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use blend_application::{PublishBlendInput, PublishCredentials};
use blend_core::AppError;

use crate::dto::{PublishBlendRequest, PublishBlendResponse};
use crate::error::ApiResult;
use crate::request_headers::RequestCredentials;
use crate::state::AppState;

pub async fn publish_blend_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PublishBlendRequest>, JsonRejection>,
) -> ApiResult<Json<PublishBlendResponse>> {
    let request_credentials = RequestCredentials::from_headers(&headers);
    let personal_access_token =
        request_credentials.personal_access_token(&state.credential_defaults)?;
    let base_url = request_credentials.base_url(&state.credential_defaults)?;

    let Json(request) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let definition = request.to_definition()?;

    let published = state
        .blend_publish_service
        .publish(PublishBlendInput {
            definition,
            credentials: PublishCredentials {
                personal_access_token,
                base_url,
                directory: request_credentials.directory(&state.credential_defaults),
                webhook_secret: request_credentials.webhook_secret(),
            },
            dry_run: request.dry_run,
            add_access_grant: request.add_access_grant,
        })
        .await?;

    Ok(Json(PublishBlendResponse {
        success: true,
        dry_run: published.dry_run,
        explore_url: published.explore_path,
        lookml_model: published.lookml_model,
        explore_name: published.explore_name,
        change: published.change.map(|change| change.as_str().to_owned()),
        lookml: published.dry_run.then_some(published.lookml),
    }))
}
