use axum::body::Body;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;

/// Dashboard single-page app, embedded at build time.
#[derive(RustEmbed)]
#[folder = "frontend/dist"]
struct DashboardAssets;

/// Router fallback: static assets, then `index.html` for client-side routes.
pub async fn serve_fallback(method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::NOT_FOUND.into_response();
    }
    serve_asset_path(uri.path())
}

fn serve_asset_path(path: &str) -> Response {
    let requested = path.trim_start_matches('/');
    let target = if requested.is_empty() {
        "index.html"
    } else {
        requested
    };

    if target.contains("..") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    if let Some(response) = response_for_file(target) {
        return response;
    }

    if !target.contains('.') && !target.starts_with("api/") {
        if let Some(response) = response_for_file("index.html") {
            return response;
        }
    }

    StatusCode::NOT_FOUND.into_response()
}

fn response_for_file(path: &str) -> Option<Response> {
    let file = DashboardAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let mut response = Response::new(Body::from(file.data.into_owned()));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref()).ok()?,
    );
    Some(response)
}
