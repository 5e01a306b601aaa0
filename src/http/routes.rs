//! Query API routing

use crate::email::Email;
use crate::http::error::HttpError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::store::EmailStore;

use serde::Serialize;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Embedded browser UI assets served under `/static/`
const STATIC_FILES: &[(&str, &str, &str)] = &[
    ("app.js", "application/javascript", include_str!("../../static/app.js")),
    ("style.css", "text/css", include_str!("../../static/style.css")),
];

#[derive(Serialize)]
struct Status {
    status: &'static str,
}

/// Answer a request against `store`
pub fn route(request: &HttpRequest, store: &EmailStore) -> Result<HttpResponse, HttpError> {
    let path = request.path.as_str();
    let is_get = request.method == "GET";

    if path == "/api/emails" {
        if !is_get {
            return Ok(HttpResponse::method_not_allowed());
        }
        return list_emails(store);
    }

    if let Some(id) = path.strip_prefix("/api/emails/") {
        if !is_get {
            return Ok(HttpResponse::method_not_allowed());
        }
        return get_email(store, id);
    }

    if path == "/api/clear" {
        if request.method != "POST" {
            return Ok(HttpResponse::method_not_allowed());
        }
        store.clear();
        return HttpResponse::json(&Status { status: "ok" });
    }

    if !is_get {
        return Ok(HttpResponse::not_found());
    }

    if path == "/" {
        return Ok(HttpResponse::new(200, "text/html; charset=utf-8", INDEX_HTML));
    }

    if let Some(name) = path.strip_prefix("/static/") {
        return Ok(static_file(name));
    }

    Ok(HttpResponse::not_found())
}

/// All emails, newest first
fn list_emails(store: &EmailStore) -> Result<HttpResponse, HttpError> {
    let mut emails: Vec<Email> = store.list();
    emails.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    HttpResponse::json(&emails)
}

fn get_email(store: &EmailStore, id: &str) -> Result<HttpResponse, HttpError> {
    if id.is_empty() {
        return Ok(HttpResponse::error(400, "Email ID not specified"));
    }

    match store.get(id) {
        Some(email) => HttpResponse::json(&email),
        None => Ok(HttpResponse::error(404, "Email not found")),
    }
}

fn static_file(name: &str) -> HttpResponse {
    STATIC_FILES
        .iter()
        .find(|(file, _, _)| *file == name)
        .map_or_else(HttpResponse::not_found, |&(_, content_type, content)| {
            HttpResponse::new(200, content_type, content)
        })
}
