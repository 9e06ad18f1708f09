use cosmosign_core::utils::Redact;
use cosmosign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the account name and the base64 encoded master key.
///
/// Credentials are supplied per request and never persisted.
#[derive(Default, Clone)]
pub struct Credential {
    /// Cosmos DB account name.
    pub account_name: String,
    /// Base64 encoded master key of the account.
    pub master_key: String,
}

impl Credential {
    /// Create a new credential from account name and master key.
    pub fn new(account_name: impl Into<String>, master_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            master_key: master_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account_name", &self.account_name)
            .field("master_key", &Redact::from(&self.master_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.master_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_master_key() {
        let cred = Credential::new(
            "myaccount",
            "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8gISIjJCUmJygpKissLS4vMDEyMzQ1Njc4OTo7PD0+Pw==",
        );

        let output = format!("{cred:?}");
        assert!(output.contains("myaccount"));
        assert!(output.contains("AAE***w=="));
        assert!(!output.contains("BgcICQoLDA0ODxAREhMU"));
    }

    #[test]
    fn test_is_valid() {
        assert!(Credential::new("myaccount", "a2V5").is_valid());
        assert!(!Credential::new("myaccount", "").is_valid());
        assert!(!Credential::default().is_valid());
    }
}
