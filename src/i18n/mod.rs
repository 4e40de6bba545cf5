//! Per-request language selection.
//!
//! The resolved language is an explicit value carried through request
//! extensions and handler arguments, never process-global state. Resolution
//! order: `?lang=` query parameter, then the first supported primary subtag
//! of `Accept-Language`, then English.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Uz,
    Ru,
}

impl Lang {
    pub const SUPPORTED: [Lang; 3] = [Lang::En, Lang::Uz, Lang::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Uz => "uz",
            Lang::Ru => "ru",
        }
    }

    pub fn from_code(code: &str) -> Option<Lang> {
        Lang::SUPPORTED.iter().copied().find(|l| l.code() == code)
    }
}

/// Resolve the request language from the raw query string and headers.
pub fn resolve(query: Option<&str>, headers: &HeaderMap) -> Lang {
    if let Some(lang) = query.and_then(query_lang_param).and_then(|c| Lang::from_code(&c)) {
        return lang;
    }

    if let Some(accept) = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
    {
        for entry in accept.split(',') {
            // "uz-Latn;q=0.8" -> "uz"
            let tag = entry.split(';').next().unwrap_or("").trim();
            let primary = tag.split('-').next().unwrap_or("");
            if let Some(lang) = Lang::from_code(primary) {
                return lang;
            }
        }
    }

    Lang::default()
}

fn query_lang_param(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next()?;
        let value = parts.next()?;
        if key == "lang" {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Resolves the language once per request and echoes it back in the
/// `Content-Language` response header.
pub async fn language_middleware(mut request: Request<Body>, next: Next) -> Response {
    let lang = resolve(request.uri().query(), request.headers());
    request.extensions_mut().insert(lang);

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_LANGUAGE,
        HeaderValue::from_static(lang.code()),
    );
    response
}

#[async_trait]
impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(lang) = parts.extensions.get::<Lang>() {
            return Ok(*lang);
        }
        Ok(resolve(parts.uri.query(), &parts.headers))
    }
}
