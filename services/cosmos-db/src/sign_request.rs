use async_trait::async_trait;
use cosmosign_core::time::{format_http_date, now, DateTime};
use cosmosign_core::{Context, Error, Result, SignRequest};
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderValue;

use crate::constants::{COSMOS_API_VERSION, X_MS_DATE, X_MS_VERSION};
use crate::credential::Credential;
use crate::resource::parse_resource_path;
use crate::sign::sign;

/// RequestSigner that implements Cosmos DB master key authorization.
///
/// Resource type and link are derived from the request path, so the request
/// uri must address a Cosmos DB resource such as `/dbs/{db}/colls/{coll}/docs`.
///
/// - [Access control on Cosmos DB resources](https://learn.microsoft.com/en-us/rest/api/cosmos-db/access-control-on-cosmosdb-resources)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new RequestSigner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::invalid_argument("credential is required"));
        };

        let (resource_type, resource_link) = parse_resource_path(req.uri.path())?;
        let date = format_http_date(self.time.unwrap_or_else(now));
        let token = sign(
            req.method.as_str(),
            &date,
            &resource_type,
            &resource_link,
            &cred.master_key,
        )?;

        req.headers.insert(X_MS_DATE, HeaderValue::from_str(&date)?);
        req.headers
            .insert(X_MS_VERSION, HeaderValue::from_static(COSMOS_API_VERSION));
        req.headers.insert(AUTHORIZATION, token.to_header_value()?);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticCredentialProvider;
    use chrono::TimeZone;
    use cosmosign_core::{ErrorKind, Signer};

    const KEY: &str =
        "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8gISIjJCUmJygpKissLS4vMDEyMzQ1Njc4OTo7PD0+Pw==";

    fn parts(uri: &str) -> Parts {
        http::Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_sign_request_with_fixed_time() {
        let time = chrono::Utc
            .with_ymd_and_hms(2017, 4, 27, 0, 51, 12)
            .unwrap();
        let builder = RequestSigner::new().with_time(time);
        let cred = Credential::new("acct", KEY);

        let mut parts =
            parts("https://acct.documents.azure.com/dbs/ToDoList/colls/Items/docs");
        builder
            .sign_request(&Context::new(), &mut parts, Some(&cred))
            .await
            .unwrap();

        assert_eq!(parts.headers[X_MS_DATE], "Thu, 27 Apr 2017 00:51:12 GMT");
        assert_eq!(parts.headers[X_MS_VERSION], "2018-12-31");
        assert_eq!(
            parts.headers[AUTHORIZATION],
            "type%3Dmaster%26ver%3D1.0%26sig%3DvzmD49%2FRy7tn6S%2FbE6S43DbEyAtbi8DUr%2BtDmEIPgAQ%3D"
        );
        assert!(parts.headers[AUTHORIZATION].is_sensitive());
    }

    #[tokio::test]
    async fn test_sign_request_without_credential() {
        let mut parts = parts("https://acct.documents.azure.com/dbs");
        let err = RequestSigner::new()
            .sign_request(&Context::new(), &mut parts, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(parts.headers.is_empty());
    }

    #[tokio::test]
    async fn test_signer_with_static_credential() {
        let signer = Signer::new(
            Context::new(),
            StaticCredentialProvider::new("acct", KEY),
            RequestSigner::new(),
        );

        let mut parts = parts("https://acct.documents.azure.com/dbs/db/colls");
        signer.sign(&mut parts).await.unwrap();

        assert!(parts.headers.contains_key(X_MS_DATE));
        assert!(parts.headers[AUTHORIZATION]
            .to_str()
            .unwrap()
            .starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"));
    }
}
