use cosmosign_core::{Context, OsEnv};
use cosmosign_cosmos_db::{Config, Gateway};
use cosmosign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

/// Context that sends requests with a default reqwest client and reads the
/// process environment.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::new(Client::new()))
        .with_env(OsEnv)
}

/// Gateway over [`default_context`], configured from the environment.
pub fn default_gateway() -> Gateway {
    let ctx = default_context();
    let config = Config::default().from_env(&ctx);
    Gateway::new(ctx, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_reads_os_env() {
        let ctx = default_context();
        assert_eq!(ctx.env_var("PATH"), std::env::var("PATH").ok());
    }

    #[tokio::test]
    async fn test_default_gateway_rejects_missing_ids() {
        let gateway = default_gateway();
        let cred = cosmosign_cosmos_db::Credential::new("acct", "a2V5");

        let err = gateway.list_documents("", "coll", &cred).await.unwrap_err();
        assert_eq!(err.kind(), cosmosign_core::ErrorKind::InvalidArgument);
    }
}
