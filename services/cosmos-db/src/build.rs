use bytes::Bytes;
use cosmosign_core::Result;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};

use crate::constants::{COSMOS_API_VERSION, X_MS_DATE, X_MS_VERSION};
use crate::resource::ForwardTarget;
use crate::sign::AuthorizationToken;

/// Build the outbound request for `target`.
///
/// Only `Accept`, `authorization`, `x-ms-date` and `x-ms-version` are set.
/// The body of a `POST` is sent verbatim as `application/json`, bodies of
/// other methods are dropped.
///
/// `date` must be the value `token` was computed with.
pub fn build_request(
    target: &ForwardTarget,
    token: &AuthorizationToken,
    date: &str,
) -> Result<http::Request<Bytes>> {
    let mut builder = http::Request::builder()
        .method(target.method.clone())
        .uri(target.uri.clone())
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .header(AUTHORIZATION, token.to_header_value()?)
        .header(X_MS_DATE, HeaderValue::from_str(date)?)
        .header(X_MS_VERSION, HeaderValue::from_static(COSMOS_API_VERSION));

    let body = match (&target.method, &target.body) {
        (&Method::POST, Some(body)) => {
            builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            body.clone()
        }
        _ => Bytes::new(),
    };

    Ok(builder.body(body)?)
}
