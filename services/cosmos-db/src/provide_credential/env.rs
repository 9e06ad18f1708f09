use async_trait::async_trait;
use cosmosign_core::{Context, ProvideCredential, Result};

use crate::constants::{COSMOS_ACCOUNT_NAME, COSMOS_MASTER_KEY};
use crate::credential::Credential;

/// EnvCredentialProvider loads the credential from `COSMOS_ACCOUNT_NAME` and `COSMOS_MASTER_KEY`.
///
/// Returns `None` unless the master key is set.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(master_key) = ctx.env_var(COSMOS_MASTER_KEY).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        let account_name = ctx.env_var(COSMOS_ACCOUNT_NAME).unwrap_or_default();

        Ok(Some(Credential::new(account_name, master_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmosign_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_env_credential_provider() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (COSMOS_ACCOUNT_NAME.to_string(), "myaccount".to_string()),
                (COSMOS_MASTER_KEY.to_string(), "a2V5".to_string()),
            ]),
        });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.account_name, "myaccount");
        assert_eq!(cred.master_key, "a2V5");
    }

    #[tokio::test]
    async fn test_env_credential_provider_without_key() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(COSMOS_ACCOUNT_NAME.to_string(), "myaccount".to_string())]),
        });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }
}
