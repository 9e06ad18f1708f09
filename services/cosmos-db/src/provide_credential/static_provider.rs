use async_trait::async_trait;
use cosmosign_core::{Context, ProvideCredential, Result};

use crate::credential::Credential;

/// StaticCredentialProvider hands out the credential supplied with an inbound request.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider from account name and master key.
    pub fn new(account_name: &str, master_key: &str) -> Self {
        Self {
            credential: Credential::new(account_name, master_key),
        }
    }
}

impl From<Credential> for StaticCredentialProvider {
    fn from(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() {
        let provider = StaticCredentialProvider::new("myaccount", "a2V5");
        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(cred.account_name, "myaccount");
        assert_eq!(cred.master_key, "a2V5");
    }
}
