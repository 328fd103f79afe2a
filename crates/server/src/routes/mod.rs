pub mod health;
pub mod members;
pub mod teams;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use std::convert::Infallible;

use crate::error::ApiErr;

/// Representation requested by the client.
///
/// HTML fragments unless the `Accept` header prefers `application/json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

const EXACT: u8 = 2;

/// Most specific media range in `accept` matching `ty/subtype`, as
/// `(specificity, q)`. Missing `q` means 1.0.
fn quality(accept: &str, ty: &str, subtype: &str) -> Option<(u8, f32)> {
    let mut best: Option<(u8, f32)> = None;
    for range in accept.split(',') {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or("").trim();
        let Some((t, s)) = media.split_once('/') else {
            continue;
        };
        let specificity = match (t.trim(), s.trim()) {
            (t, s) if t.eq_ignore_ascii_case(ty) && s.eq_ignore_ascii_case(subtype) => EXACT,
            (t, "*") if t.eq_ignore_ascii_case(ty) => 1,
            ("*", "*") => 0,
            _ => continue,
        };
        let q = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);
        if best.is_none_or(|(seen, _)| specificity > seen) {
            best = Some((specificity, q));
        }
    }
    best
}

impl Format {
    /// JSON when `application/json` is named explicitly with a non-zero
    /// quality at least that of `text/html`. Otherwise HTML.
    pub fn from_accept(accept: &str) -> Self {
        let html = quality(accept, "text", "html").map_or(0.0, |(_, q)| q);
        match quality(accept, "application", "json") {
            Some((EXACT, json)) if json > 0.0 && json >= html => Self::Json,
            _ => Self::Html,
        }
    }

    /// Render `data` as JSON, or as HTML through `html`.
    pub fn respond<T: Serialize>(
        self,
        status: StatusCode,
        data: T,
        html: impl FnOnce(&T) -> String,
    ) -> Response {
        match self {
            Self::Json => (status, Json(data)).into_response(),
            Self::Html => (status, Html(html(&data))).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        Ok(Self::from_accept(accept))
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiErr {
    ApiErr::not_found("Not found")
}
