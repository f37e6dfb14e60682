use crate::client::{HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
use chrono::{offset::LocalResult, DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;

/// Rate limit status reported alongside every response.
///
/// Unauthenticated requests are limited to 60 per hour, authenticated requests to 5,000.
///
/// GitHub API docs: https://developer.github.com/v3/#rate-limiting
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rate {
    pub limit: usize,
    pub remaining: usize,
    /// UTC epoch seconds
    pub reset: i64,
}

impl Rate {
    pub(super) fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: parse_header(headers, HEADER_RATE_LIMIT).unwrap_or_default(),
            remaining: parse_header(headers, HEADER_RATE_REMAINING).unwrap_or_default(),
            reset: parse_header(headers, HEADER_RATE_RESET).unwrap_or_default(),
        }
    }

    /// Whether Github reported the quota as used up. Responses without rate headers are never
    /// considered exhausted.
    pub(super) fn is_exhausted(headers: &HeaderMap) -> bool {
        parse_header::<usize>(headers, HEADER_RATE_REMAINING) == Some(0)
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        match Utc.timestamp_opt(self.reset, 0) {
            LocalResult::Single(datetime) if self.reset > 0 => Some(datetime),
            _ => None,
        }
    }
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse().ok())
}
