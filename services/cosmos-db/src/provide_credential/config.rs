use async_trait::async_trait;
use cosmosign_core::{Context, ProvideCredential, Result};

use crate::config::Config;
use crate::credential::Credential;

/// ConfigCredentialProvider builds the credential out of a [`Config`].
#[derive(Clone, Debug)]
pub struct ConfigCredentialProvider {
    config: Config,
}

impl ConfigCredentialProvider {
    /// Create a new ConfigCredentialProvider.
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(master_key) = self.config.master_key.as_ref() else {
            return Ok(None);
        };

        Ok(Some(Credential::new(
            self.config.account_name.clone().unwrap_or_default(),
            master_key.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_credential_provider() {
        let provider = ConfigCredentialProvider::new(Config {
            account_name: Some("myaccount".to_string()),
            master_key: Some("a2V5".to_string()),
            ..Default::default()
        });

        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.account_name, "myaccount");
        assert_eq!(cred.master_key, "a2V5");

        let provider = ConfigCredentialProvider::new(Config::default());
        assert!(provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .is_none());
    }
}
