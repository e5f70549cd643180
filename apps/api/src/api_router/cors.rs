use axum::http::header::{CONTENT_TYPE, HeaderName};
use axum::http::{HeaderValue, Method};
use blend_core::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::request_headers::{
    BASE_URL_HEADER, CLIENT_ID_HEADER, CLIENT_SECRET_HEADER, PERSONAL_ACCESS_TOKEN_HEADER,
    WEBHOOK_SECRET_HEADER,
};

pub(super) fn build_cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, AppError> {
    let allow_origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin).map_err(|error| {
            AppError::Internal(format!("invalid CORS_ALLOWED_ORIGIN: {error}"))
        })?),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(PERSONAL_ACCESS_TOKEN_HEADER),
            HeaderName::from_static(BASE_URL_HEADER),
            HeaderName::from_static(CLIENT_ID_HEADER),
            HeaderName::from_static(CLIENT_SECRET_HEADER),
            HeaderName::from_static(WEBHOOK_SECRET_HEADER),
        ]))
}
