//! HTTP server for faceserve - the front desk of the font library
//!
//! Three kinds of visitors show up here: browsers fetching a stylesheet for
//! one font, browsers fetching a stylesheet for a whole family, and browsers
//! coming back with the stylesheet's `url(...)` in hand to collect the font
//! binary itself. Everything is answered out of the live index; nothing here
//! ever walks the filesystem looking for fonts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use faceserve_core::config::Config;
use faceserve_core::css::{family_css, font_face_css};
use faceserve_core::extract::FontFormat;
use faceserve_core::index::FontIndex;

use crate::cache::CssCache;

/// Shared handler state: the live index and the CSS response cache.
#[derive(Clone)]
pub struct AppState {
    index: Arc<FontIndex>,
    cache: Arc<CssCache>,
}

impl AppState {
    pub fn new(index: Arc<FontIndex>, cache_lifetime: Duration) -> Self {
        Self {
            index,
            cache: Arc::new(CssCache::new(cache_lifetime)),
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind: &str, index: Arc<FontIndex>, config: &Config) -> Result<()> {
    let state = AppState::new(
        index,
        Duration::from_secs(config.global.cache_lifetime * 60),
    );

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding HTTP server to {bind}"))?;
    log::info!("listening on {bind}");

    axum::serve(listener, router(state))
        .await
        .context("serving HTTP")?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/font/{filename}", get(font_entry))
        .route("/font/family/{filename}", get(family_entry))
        .with_state(state)
}

/// Dispatch on the requested extension: `.css` serves a stylesheet for one
/// font, a known font extension serves the binary, anything else is a 404.
async fn font_entry(
    Path(filename): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let Some((stem, ext)) = split_extension(&filename) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if ext.eq_ignore_ascii_case("css") {
        return font_css(&state, stem);
    }

    match FontFormat::from_extension(ext) {
        Some(format) => font_binary(&state, stem, format, &headers).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Stylesheet covering every member of a family, by family-name prefix.
async fn family_entry(Path(filename): Path<String>, State(state): State<AppState>) -> Response {
    let Some((name, ext)) = split_extension(&filename) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !ext.eq_ignore_ascii_case("css") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let cache_key = format!("family:{name}");
    let generation = state.index.generation();
    if let Some(css) = state.cache.get(&cache_key, generation) {
        return css_response(css);
    }

    let members = state.index.find_by_family_prefix(name);
    match family_css(&members) {
        Some(css) => {
            state.cache.put(cache_key, css.clone(), generation);
            css_response(css)
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn font_css(state: &AppState, name: &str) -> Response {
    let cache_key = format!("font:{name}");
    let generation = state.index.generation();
    if let Some(css) = state.cache.get(&cache_key, generation) {
        return css_response(css);
    }

    match state.index.find_by_full_name(name) {
        Some(record) => {
            let css = font_face_css(&record);
            state.cache.put(cache_key, css.clone(), generation);
            css_response(css)
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn font_binary(
    state: &AppState,
    id: &str,
    format: FontFormat,
    headers: &HeaderMap,
) -> Response {
    let Some(record) = state.index.find_by_id(id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // The stylesheet only ever advertises the record's own format; any other
    // extension does not exist in this namespace.
    if format != record.format {
        return StatusCode::NOT_FOUND.into_response();
    }

    if if_none_match_hits(headers, &record.content_hash) {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let bytes = match tokio::fs::read(&record.path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            // Indexed but unreadable: the file raced away under us.
            log::warn!("cannot read font file {}: {err}", record.path.display());
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    (
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::ETAG, record.content_hash.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.{}\"", id, format.extension()),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn css_response(css: String) -> Response {
    ([(header::CONTENT_TYPE, "text/css")], css).into_response()
}

fn split_extension(filename: &str) -> Option<(&str, &str)> {
    let dot = filename.rfind('.')?;
    let (stem, ext) = (&filename[..dot], &filename[dot + 1..]);
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext))
}

fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| candidate.trim().trim_matches('"') == etag)
}
