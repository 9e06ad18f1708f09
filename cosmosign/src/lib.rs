//! Sign and forward Cosmos DB REST requests.
//!
//! This crate re-exports [`cosmosign_core`] at its root and the Cosmos DB
//! gateway under [`cosmos_db`]. With the `default-context` feature it also
//! ships a [`Context`] backed by reqwest and the process environment.
//!
//! ```no_run
//! # async fn example() -> cosmosign::Result<()> {
//! use cosmosign::cosmos_db::Credential;
//!
//! let gateway = cosmosign::default_gateway();
//! let cred = Credential::new("myaccount", "bWFzdGVyLWtleQ==");
//! let docs = gateway.list_documents("ToDoList", "Items", &cred).await?;
//! # Ok(())
//! # }
//! ```

pub use cosmosign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::{default_context, default_gateway};

pub mod cosmos_db {
    pub use cosmosign_cosmos_db::*;
}
