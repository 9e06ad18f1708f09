//! Follow `x-ms-continuation` to list every document of a container.

use bytes::Bytes;
use cosmosign_core::time::{format_http_date, now};
use cosmosign_core::{Context, Error, Result};
use http::{HeaderMap, HeaderValue, StatusCode};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::build::build_request;
use crate::constants::X_MS_CONTINUATION;
use crate::credential::Credential;
use crate::resource::ForwardTarget;
use crate::send::send;
use crate::sign::sign;

/// Documents merged from every page of a listing.
///
/// Serializes as `{"documents": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSet {
    /// Documents in the order the store returned them.
    pub documents: Vec<Value>,
}

/// Body of one listing page.
///
/// The store names the field `Documents`, both spellings are accepted.
/// If a body carries both, `documents` wins.
#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    documents: Option<Vec<Value>>,
    #[serde(default, rename = "Documents")]
    store_documents: Option<Vec<Value>>,
}

impl Page {
    fn into_documents(self) -> Option<Vec<Value>> {
        self.documents.or(self.store_documents)
    }
}

/// Decoded value of the `x-ms-continuation` response header.
#[derive(Deserialize)]
struct Continuation {
    #[serde(default)]
    token: Option<String>,
}

/// Documents collected so far and the token to resume from.
#[derive(Debug, Default)]
struct FetchState {
    documents: Vec<Value>,
    continuation: Option<String>,
}

impl FetchState {
    /// Absorb one page, returns whether another page must be fetched.
    fn absorb(&mut self, documents: Vec<Value>, continuation: Option<String>) -> bool {
        self.documents.extend(documents);
        self.continuation = continuation;
        self.continuation.is_some()
    }
}

/// List every document of `dbs/{database_id}/colls/{container_id}`.
///
/// The request is signed once and the same `authorization` / `x-ms-date`
/// pair is reused for every continuation page. Pages are fetched one after
/// another. Any failure discards the documents collected so far.
///
/// A first page without documents ends the listing. Later pages without
/// documents count as empty and their continuation is still followed.
///
/// `deadline` bounds the whole listing; once it passes the listing fails
/// with `Cancelled`.
pub async fn fetch_all_documents(
    ctx: &Context,
    endpoint: &str,
    database_id: &str,
    container_id: &str,
    credential: &Credential,
    deadline: Option<Instant>,
) -> Result<DocumentSet> {
    let target = ForwardTarget::list_documents(endpoint, database_id, container_id)?;

    let date = format_http_date(now());
    let token = sign(
        target.method.as_str(),
        &date,
        &target.resource_type,
        &target.resource_link,
        &credential.master_key,
    )?;

    let mut state = FetchState::default();
    let mut page = 0;
    loop {
        page += 1;

        let mut req = build_request(&target, &token, &date)?;
        if let Some(continuation) = &state.continuation {
            let value = HeaderValue::from_str(continuation).map_err(|e| {
                Error::unexpected("continuation token is not a valid header value").with_source(e)
            })?;
            req.headers_mut().insert(X_MS_CONTINUATION, value);
        }

        let (parts, body) = send(ctx, req, deadline).await?.into_parts();
        if !parts.status.is_success() {
            warn!(
                "listing {} failed at page {page} with status {}",
                target.resource_link, parts.status
            );
            return Err(Error::upstream(
                parts.status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }

        let documents = match parse_page(&body)? {
            Some(documents) => documents,
            None if page == 1 => {
                debug!(
                    "listing {} first page carries no documents, stop",
                    target.resource_link
                );
                break;
            }
            None => Vec::new(),
        };
        let continuation = parse_continuation(&parts.headers, parts.status)?;

        debug!(
            "listing {} page {page}: {} documents, continuation: {}",
            target.resource_link,
            documents.len(),
            continuation.is_some()
        );

        if !state.absorb(documents, continuation) {
            break;
        }
    }

    Ok(DocumentSet {
        documents: state.documents,
    })
}

/// Parse the documents of one page.
///
/// Returns `None` if the field is absent or `null`.
fn parse_page(body: &Bytes) -> Result<Option<Vec<Value>>> {
    if body.is_empty() {
        return Ok(None);
    }

    let page: Page = serde_json::from_slice(body).map_err(|e| {
        Error::unexpected("failed to parse documents page").with_source(e)
    })?;
    Ok(page.into_documents())
}

/// Extract the literal continuation value out of the response headers.
///
/// Returns `None` when the header is absent or its token is empty.
fn parse_continuation(headers: &HeaderMap, status: StatusCode) -> Result<Option<String>> {
    let Some(value) = headers.get(X_MS_CONTINUATION) else {
        return Ok(None);
    };

    let continuation: Continuation = serde_json::from_slice(value.as_bytes()).map_err(|e| {
        Error::upstream(
            status.as_u16(),
            format!("malformed {X_MS_CONTINUATION} header: {e}"),
        )
        .with_source(e)
    })?;

    Ok(continuation.token.filter(|v| !v.is_empty()))
}
