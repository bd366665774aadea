use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::convert::Infallible;
use tally_core::ActorId;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";
const USER_AGENT: &str = "user-agent";
const ACCEPT_LANGUAGE: &str = "accept-language";

const FINGERPRINT_LENGTH: usize = 32;

/// Derives a best-effort visitor identifier from request headers.
///
/// First match wins:
///
/// 1. the first entry of `x-forwarded-for`, trimmed;
/// 2. `x-real-ip`, verbatim;
/// 3. base64 of `user-agent` followed by `accept-language`, cut to 32 characters.
///
/// Shared NAT, proxies and private browsing all make this collide or drift.
/// It only suppresses obvious repeats. The result may be empty.
pub fn identify(headers: &HeaderMap) -> ActorId {
    if let Some(first) = header(headers, FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
    {
        return ActorId::new(first);
    }

    if let Some(real_ip) = header(headers, REAL_IP) {
        return ActorId::new(real_ip);
    }

    let user_agent = header(headers, USER_AGENT).unwrap_or_default();
    let language = header(headers, ACCEPT_LANGUAGE).unwrap_or_default();
    let mut fingerprint = STANDARD.encode(format!("{user_agent}{language}"));
    // Base64 output is ASCII, so truncating by bytes is safe.
    fingerprint.truncate(FINGERPRINT_LENGTH);
    ActorId::new(fingerprint)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Extractor resolving the [`ActorId`] of the caller once per request.
#[derive(Debug, Clone)]
pub struct Visitor(pub ActorId);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Visitor(identify(&parts.headers)))
    }
}
