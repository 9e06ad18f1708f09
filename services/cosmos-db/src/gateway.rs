use std::str::FromStr;

use bytes::Bytes;
use cosmosign_core::time::{format_http_date, now};
use cosmosign_core::{Context, Error, Result};
use http::{Method, StatusCode, Uri};
use log::{debug, warn};
use tokio::time::Instant;

use crate::build::build_request;
use crate::config::Config;
use crate::credential::Credential;
use crate::paginate::{fetch_all_documents, DocumentSet};
use crate::resource::ForwardTarget;
use crate::send::send;
use crate::sign::sign;

/// Operation mode selected by the inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Forward the request to any resource and return the response verbatim.
    Forward,
    /// List every document of a container, following continuation tokens.
    ListDocuments,
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "passthrough" | "pass-through" => Ok(Operation::Forward),
            "list-documents" | "listdocuments" | "list_documents" => Ok(Operation::ListDocuments),
            _ => Err(Error::unknown_operation(format!(
                "operation {s:?} is not supported"
            ))),
        }
    }
}

/// Fields collected by the dispatcher from the inbound request.
///
/// Which fields are required depends on the [`Operation`].
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    /// Absolute uri of the resource to forward to.
    pub target_uri: Option<String>,
    /// HTTP method to forward with, `GET` if absent.
    pub method: Option<String>,
    /// Resource type, derived from the target uri if absent.
    pub resource_type: Option<String>,
    /// Body of the inbound request.
    pub body: Option<Bytes>,
    /// Database id for listing documents.
    pub database_id: Option<String>,
    /// Container id for listing documents.
    pub container_id: Option<String>,
}

/// Response of a forwarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResponse {
    /// Status returned by the store.
    pub status: StatusCode,
    /// Body returned by the store, untouched.
    pub body: Bytes,
}

/// Result of [`Gateway::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    /// Response of [`Operation::Forward`].
    Forward(ForwardResponse),
    /// Response of [`Operation::ListDocuments`].
    Documents(DocumentSet),
}

/// Gateway signs inbound requests and forwards them to a Cosmos DB account.
///
/// The gateway owns no mutable state: every call signs with a fresh date and
/// builds its own requests.
#[derive(Debug, Clone)]
pub struct Gateway {
    ctx: Context,
    config: Config,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(ctx: Context, config: Config) -> Self {
        Self { ctx, config }
    }

    fn deadline(&self) -> Option<Instant> {
        self.config.timeout.map(|v| Instant::now() + v)
    }

    /// Forward one request and return the store's response verbatim.
    ///
    /// Non-success statuses fail with an upstream error carrying status and body.
    pub async fn forward(
        &self,
        target: &ForwardTarget,
        credential: &Credential,
    ) -> Result<ForwardResponse> {
        let date = format_http_date(now());
        let token = sign(
            target.method.as_str(),
            &date,
            &target.resource_type,
            &target.resource_link,
            &credential.master_key,
        )?;
        let req = build_request(target, &token, &date)?;

        debug!("forwarding {} {}", target.method, target.uri);
        let (parts, body) = send(&self.ctx, req, self.deadline()).await?.into_parts();
        if !parts.status.is_success() {
            warn!(
                "forwarding {} {} failed with status {}",
                target.method, target.uri, parts.status
            );
            return Err(Error::upstream(
                parts.status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }

        Ok(ForwardResponse {
            status: parts.status,
            body,
        })
    }

    /// List every document of a container.
    pub async fn list_documents(
        &self,
        database_id: &str,
        container_id: &str,
        credential: &Credential,
    ) -> Result<DocumentSet> {
        let endpoint = self.endpoint(credential)?;
        fetch_all_documents(
            &self.ctx,
            &endpoint,
            database_id,
            container_id,
            credential,
            self.deadline(),
        )
        .await
    }

    /// Route an inbound request to the selected operation.
    pub async fn dispatch(
        &self,
        operation: Operation,
        req: InboundRequest,
        credential: &Credential,
    ) -> Result<GatewayResponse> {
        match operation {
            Operation::Forward => {
                let target = forward_target(req)?;
                self.forward(&target, credential)
                    .await
                    .map(GatewayResponse::Forward)
            }
            Operation::ListDocuments => {
                let database_id = required(req.database_id, "database id")?;
                let container_id = required(req.container_id, "container id")?;
                self.list_documents(&database_id, &container_id, credential)
                    .await
                    .map(GatewayResponse::Documents)
            }
        }
    }

    /// Endpoint from config, falling back to the credential's account.
    fn endpoint(&self, credential: &Credential) -> Result<String> {
        if self.config.endpoint.is_none() && self.config.account_name.is_none() {
            return Config {
                account_name: Some(credential.account_name.clone()),
                ..Default::default()
            }
            .endpoint();
        }

        self.config.endpoint()
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::invalid_argument(format!("{name} is required")))
}

fn forward_target(req: InboundRequest) -> Result<ForwardTarget> {
    let uri: Uri = required(req.target_uri, "target uri")?.parse()?;
    let method = match req.method.filter(|v| !v.is_empty()) {
        Some(v) => Method::from_bytes(v.to_ascii_uppercase().as_bytes()).map_err(|e| {
            Error::invalid_argument(format!("method {v:?} is invalid")).with_source(e)
        })?,
        None => Method::GET,
    };

    let mut target = ForwardTarget::from_uri(method, uri)?;
    if let Some(resource_type) = req.resource_type.filter(|v| !v.is_empty()) {
        target = target.with_resource_type(resource_type);
    }
    if let Some(body) = req.body {
        target = target.with_body(body);
    }
    Ok(target)
}
