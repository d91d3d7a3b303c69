//! Turns a [`RequestDescriptor`] into a ready-to-send [`HttpRequest`].

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderName, HeaderValue, Method};
use url::Url;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::HttpRequest;

use super::RequestDescriptor;
use super::idempotency::IdGenerator;

/// Header carrying the account (space) identifier.
pub const TENANT_HEADER: &str = "x-account-id";

/// Header carrying the idempotency key of a POST.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

const JSON: &str = "application/json";

const CLIENT_USER_AGENT: &str = concat!("paycore/", env!("CARGO_PKG_VERSION"));

/// Builds the request for one logical call.
///
/// The result is built once and cloned for every attempt, so a generated
/// idempotency key is shared by all retries.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the path does not form a valid URL or
/// the caller-supplied idempotency key is not a valid header value.
pub fn build_request(
    config: &ClientConfig,
    descriptor: &RequestDescriptor,
    ids: &dyn IdGenerator,
) -> Result<HttpRequest, Error> {
    let url = resolve_url(config, descriptor)?;

    let mut request = HttpRequest::new(descriptor.method().clone(), url)
        .with_header(AUTHORIZATION, config.authorization().clone())
        .with_header(HeaderName::from_static(TENANT_HEADER), config.tenant().clone())
        .with_header(ACCEPT, HeaderValue::from_static(JSON))
        .with_header(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    if let Some(body) = descriptor.body() {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| Error::validation(format!("request body is not serializable: {e}")))?;
        request = request
            .with_header(CONTENT_TYPE, HeaderValue::from_static(JSON))
            .with_body(bytes);
    }

    if *descriptor.method() == Method::POST {
        let key = descriptor
            .idempotency_key()
            .map_or_else(|| ids.generate(), ToString::to_string);
        let value = HeaderValue::from_str(&key)
            .map_err(|_| Error::validation(format!("invalid idempotency key '{key}'")))?;
        request = request.with_header(HeaderName::from_static(IDEMPOTENCY_KEY_HEADER), value);
    }

    Ok(request)
}

/// Joins base URL, API prefix and path, then appends defined query parameters.
fn resolve_url(config: &ClientConfig, descriptor: &RequestDescriptor) -> Result<Url, Error> {
    let base = config.base_url().as_str().trim_end_matches('/');
    let path = descriptor.path();
    let separator = if path.is_empty() || path.starts_with('/') {
        ""
    } else {
        "/"
    };
    let raw = format!("{base}{}{separator}{path}", config.api_prefix());

    let mut url = Url::parse(&raw)
        .map_err(|e| Error::validation(format!("invalid request path '{path}': {e}")))?;

    let mut params = descriptor.defined_query().peekable();
    if params.peek().is_some() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, &value.to_string());
        }
    }

    Ok(url)
}
