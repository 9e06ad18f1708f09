use std::fmt::{Debug, Formatter};
use std::time::Duration;

use cosmosign_core::utils::Redact;
use cosmosign_core::{Context, Error, Result};
use log::warn;

use crate::constants::*;

/// Config carries all the configuration for talking to a Cosmos DB account.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`COSMOS_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `master_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`COSMOS_MASTER_KEY`]
    pub master_key: Option<String>,
    /// Base url of the account, for example `https://myaccount.documents.azure.com`.
    ///
    /// Loaded from env value [`COSMOS_ENDPOINT`]. Falls back to the public
    /// cloud endpoint derived from `account_name`.
    pub endpoint: Option<String>,
    /// Overall deadline of one gateway call, counted from its start.
    ///
    /// Bounds a forwarded request as well as every page of a listing.
    /// Loaded from env value [`COSMOS_TIMEOUT`] in seconds.
    pub timeout: Option<Duration>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("master_key", &Redact::from(&self.master_key))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are left untouched.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.account_name.is_none() {
            self.account_name = envs.get(COSMOS_ACCOUNT_NAME).cloned();
        }
        if self.master_key.is_none() {
            self.master_key = envs.get(COSMOS_MASTER_KEY).cloned();
        }
        if self.endpoint.is_none() {
            self.endpoint = envs.get(COSMOS_ENDPOINT).cloned();
        }
        if self.timeout.is_none() {
            if let Some(v) = envs.get(COSMOS_TIMEOUT) {
                match v.parse::<u64>() {
                    Ok(secs) => self.timeout = Some(Duration::from_secs(secs)),
                    Err(_) => warn!(
                        "ignoring {}: {:?} is not a number of seconds",
                        COSMOS_TIMEOUT, v
                    ),
                }
            }
        }

        self
    }

    /// Resolve the base url requests are sent to, without trailing slash.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|v| !v.is_empty()) {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }

        match self.account_name.as_deref().filter(|v| !v.is_empty()) {
            Some(account) => Ok(format!("https://{account}.documents.azure.com")),
            None => Err(Error::invalid_argument(
                "neither endpoint nor account name is configured",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmosign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx(&[
            (COSMOS_ACCOUNT_NAME, "myaccount"),
            (COSMOS_MASTER_KEY, "a2V5"),
            (COSMOS_TIMEOUT, "30"),
        ]);

        let config = Config::default().from_env(&ctx);
        assert_eq!(
            config,
            Config {
                account_name: Some("myaccount".to_string()),
                master_key: Some("a2V5".to_string()),
                endpoint: None,
                timeout: Some(Duration::from_secs(30)),
            }
        );
        assert_eq!(
            config.endpoint().unwrap(),
            "https://myaccount.documents.azure.com"
        );
    }

    #[test]
    fn test_from_env_keeps_explicit_fields() {
        let ctx = ctx(&[
            (COSMOS_ACCOUNT_NAME, "fromenv"),
            (COSMOS_ENDPOINT, "https://localhost:8081/"),
            (COSMOS_TIMEOUT, "soon"),
        ]);

        let config = Config {
            account_name: Some("explicit".to_string()),
            ..Default::default()
        }
        .from_env(&ctx);

        assert_eq!(config.account_name.as_deref(), Some("explicit"));
        assert_eq!(config.timeout, None);
        assert_eq!(config.endpoint().unwrap(), "https://localhost:8081");
    }

    #[test]
    fn test_debug_redacts_master_key() {
        let config = Config {
            account_name: Some("myaccount".to_string()),
            master_key: Some("c2VjcmV0LW1hc3Rlci1rZXk=".to_string()),
            ..Default::default()
        };

        let output = format!("{config:?}");
        assert!(output.contains("myaccount"));
        assert!(!output.contains("c2VjcmV0LW1hc3Rlci1rZXk="));
    }

    #[test]
    fn test_endpoint_requires_account_or_endpoint() {
        let err = Config::default().endpoint().unwrap_err();
        assert_eq!(err.kind(), cosmosign_core::ErrorKind::InvalidArgument);
    }
}
