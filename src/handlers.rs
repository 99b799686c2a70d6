use axum::{
    extract::{Form, FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::app::dispatch;
use crate::components::TemplateName;
use crate::errors::WikiError;
use crate::title::extract_title;
use crate::types::{AppState, Page};

/// The `body` field, from a posted form or the query string
#[derive(Debug, Default, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub body: Option<String>,
}

/// Render an existing page
pub async fn handle_view(State(state): State<AppState>, uri: Uri) -> Result<Response, WikiError> {
    info!("View request received: '{}'", uri.path());
    let title = extract_title(uri.path())?;
    let page = state.store.load(&title)?;
    Ok(state.templates.render(TemplateName::View, &page))
}

/// Render the edit form, blank when the page does not exist yet
pub async fn handle_edit(State(state): State<AppState>, uri: Uri) -> Result<Response, WikiError> {
    info!("Edit request received: '{}'", uri.path());
    let title = extract_title(uri.path())?;
    let page = match state.store.load(&title) {
        Ok(page) => page,
        Err(e) => {
            debug!("Starting blank page '{}': {}", title, e);
            Page::empty(title)
        }
    };
    Ok(state.templates.render(TemplateName::Edit, &page))
}

/// Persist the posted body and redirect to the page view.
///
/// The `body` field is taken from the request body first, then from the
/// query string; a field missing from both saves an empty page. A body
/// that cannot be read is an error and nothing is written.
pub async fn handle_save(State(state): State<AppState>, request: Request) -> Result<Response, WikiError> {
    let uri = request.uri().clone();
    info!("Save request received: '{}'", uri.path());
    let title = extract_title(uri.path())?;

    let body = match read_posted_body(request).await? {
        Some(body) => body,
        None => read_query_body(&uri)?.unwrap_or_default(),
    };

    let page = Page::new(title, body);
    state.store.save(&page)?;
    Ok(found(&format!("/view/{}", page.title)))
}

async fn read_posted_body(request: Request) -> Result<Option<Vec<u8>>, WikiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase);

    match content_type.as_deref() {
        None => Ok(None),
        Some(ct) if ct.starts_with("multipart/form-data") => {
            let mut multipart = Multipart::from_request(request, &()).await.map_err(|rejection| {
                rejected_form(rejection.status(), rejection.body_text())
            })?;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| rejected_form(e.status(), e.body_text()))?
            {
                if field.name() == Some("body") {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| rejected_form(e.status(), e.body_text()))?;
                    return Ok(Some(bytes.to_vec()));
                }
            }
            Ok(None)
        }
        // Form rejects anything but urlencoded, so other content types end up here as errors too
        Some(_) => {
            let Form(form) = Form::<SaveForm>::from_request(request, &()).await.map_err(|rejection| {
                rejected_form(rejection.status(), rejection.body_text())
            })?;
            Ok(form.body.map(String::into_bytes))
        }
    }
}

fn read_query_body(uri: &Uri) -> Result<Option<Vec<u8>>, WikiError> {
    let Query(form) = Query::<SaveForm>::try_from_uri(uri)
        .map_err(|rejection| rejected_form(rejection.status(), rejection.body_text()))?;
    Ok(form.body.map(String::into_bytes))
}

fn rejected_form(status: StatusCode, message: String) -> WikiError {
    warn!("Rejected save form ({}): {}", status, message);
    WikiError::BadForm { status, message }
}

/// Send `/` to the configured front page
pub async fn handle_root(State(state): State<AppState>) -> Result<Response, WikiError> {
    match &state.front_page {
        Some(title) => Ok(found(&format!("/view/{}", title))),
        None => Err(WikiError::InvalidPath("/".to_string())),
    }
}

/// Anything the router did not match
pub async fn handle_not_found(uri: Uri) -> WikiError {
    match dispatch(uri.path()) {
        Some(verb) => debug!("No {:?} route for '{}'", verb, uri.path()),
        None => debug!("No route for '{}'", uri.path()),
    }
    WikiError::InvalidPath(uri.path().to_string())
}

// 302 Found; axum's Redirect helpers only emit 303/307/308.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
