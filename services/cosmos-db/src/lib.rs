//! Cosmos DB signing gateway
//!
//! This crate signs requests with Cosmos DB master key authorization and
//! forwards them to the data store:
//! - Computing the `authorization` token for a verb, date, resource type and link
//! - Forwarding one signed request and returning the response verbatim
//! - Listing every document of a container by following `x-ms-continuation`
//!
//! # Example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use cosmosign_core::Context;
//! use cosmosign_cosmos_db::{Config, Credential, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Create context with a real HttpSend implementation
//!     let ctx = Context::new();
//!
//!     let config = Config::default().from_env(&ctx);
//!     let gateway = Gateway::new(ctx, config);
//!
//!     let cred = Credential::new("myaccount", "bWFzdGVyLWtleQ==");
//!     let docs = gateway.list_documents("ToDoList", "Items", &cred).await?;
//!     println!("{}", serde_json::to_string(&docs)?);
//!
//!     Ok(())
//! }
//! ```

mod constants;
pub use constants::{
    COSMOS_ACCOUNT_NAME, COSMOS_API_VERSION, COSMOS_ENDPOINT, COSMOS_MASTER_KEY,
    COSMOS_TIMEOUT, X_MS_CONTINUATION, X_MS_DATE, X_MS_VERSION,
};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign;
pub use sign::{sign, AuthorizationToken};

mod resource;
pub use resource::ForwardTarget;

mod build;
pub use build::build_request;

mod send;

mod paginate;
pub use paginate::{fetch_all_documents, DocumentSet};

mod sign_request;
pub use sign_request::RequestSigner;

mod gateway;
pub use gateway::{ForwardResponse, Gateway, GatewayResponse, InboundRequest, Operation};

mod provide_credential;
pub use provide_credential::*;
