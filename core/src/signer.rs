use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// The credential is loaded again for every call: signatures are bound to a
/// fresh timestamp and nothing is shared between calls.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    signer: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        signer: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            signer: Arc::new(signer),
        }
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = K>,
    ) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .filter(|v| v.is_valid());

        self.signer.sign_request(&self.ctx, req, cred.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ErrorKind};
    use async_trait::async_trait;
    use http::request::Parts;
    use http::HeaderValue;

    #[derive(Clone, Debug)]
    struct Token(String);

    impl SigningCredential for Token {
        fn is_valid(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[derive(Debug)]
    struct StaticProvider(String);

    #[async_trait]
    impl ProvideCredential for StaticProvider {
        type Credential = Token;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
            Ok(Some(Token(self.0.clone())))
        }
    }

    #[derive(Debug)]
    struct HeaderSigner;

    #[async_trait]
    impl SignRequest for HeaderSigner {
        type Credential = Token;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut Parts,
            credential: Option<&Token>,
        ) -> Result<()> {
            let Some(token) = credential else {
                return Err(Error::invalid_argument("credential is required"));
            };
            req.headers
                .insert("authorization", HeaderValue::from_str(&token.0)?);
            Ok(())
        }
    }

    fn parts() -> Parts {
        http::Request::get("https://example.com/dbs")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_sign_with_provided_credential() {
        let signer = Signer::new(
            Context::new(),
            StaticProvider("abc".to_string()),
            HeaderSigner,
        );

        let mut parts = parts();
        signer.sign(&mut parts).await.unwrap();
        assert_eq!(parts.headers["authorization"], "abc");
    }

    #[tokio::test]
    async fn test_invalid_credential_is_not_passed() {
        let signer = Signer::new(Context::new(), StaticProvider(String::new()), HeaderSigner);

        let mut parts = parts();
        let err = signer.sign(&mut parts).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let signer = signer.with_credential_provider(StaticProvider("xyz".to_string()));
        signer.sign(&mut parts).await.unwrap();
        assert_eq!(parts.headers["authorization"], "xyz");
    }
}
