use blend_core::AppError;

/// Maps a non-success upstream response into an application error.
pub(crate) async fn status_error(
    operation: &str,
    response: reqwest::Response,
) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());
    let message = format!("{operation} returned status {}: {body}", status.as_u16());

    if status == reqwest::StatusCode::NOT_FOUND {
        AppError::NotFound(message)
    } else {
        AppError::Unavailable(message)
    }
}

/// Maps a transport failure into an application error.
pub(crate) fn transport_error(operation: &str, error: &reqwest::Error) -> AppError {
    AppError::Unavailable(format!("failed to call {operation}: {error}"))
}

/// Maps an unreadable response body into an application error.
pub(crate) fn decode_error(operation: &str, error: &reqwest::Error) -> AppError {
    AppError::Unavailable(format!("failed to parse {operation} response body: {error}"))
}

/// Treats a missing upstream endpoint as an unavailable upstream.
pub(crate) fn unavailable(error: AppError) -> AppError {
    match error {
        AppError::NotFound(message) => AppError::Unavailable(message),
        other => other,
    }
}
