//! Master key authorization for the Cosmos DB REST API.
//!
//! - [Access control in the Azure Cosmos DB SQL API](https://learn.microsoft.com/en-us/rest/api/cosmos-db/access-control-on-cosmosdb-resources)

use std::fmt::{Debug, Formatter, Write};

use cosmosign_core::hash::{base64_decode, base64_hmac_sha256};
use cosmosign_core::utils::Redact;
use cosmosign_core::{Error, Result};
use http::HeaderValue;
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::{MASTER_TOKEN_TYPE, TOKEN_VERSION, UNRESERVED_ENCODE_SET};

/// Percent encoded `type=master&ver=1.0&sig=<signature>`.
///
/// A token is bound to the verb, resource and date it was computed for and
/// must not outlive the request carrying that date.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationToken(String);

impl AuthorizationToken {
    /// The encoded token, ready to be used as `authorization` header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the `authorization` header value, marked as sensitive.
    pub fn to_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.0)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl Debug for AuthorizationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthorizationToken")
            .field(&Redact::from(&self.0))
            .finish()
    }
}

/// Compute the master key authorization token for one request.
///
/// `date` must be the exact value sent in the `x-ms-date` header of the same
/// request. `resource_link` is the path of the resource without leading slash
/// and without query, for example `dbs/mydb/colls/mycoll`. It may be empty
/// for account level feeds such as listing databases.
pub fn sign(
    verb: &str,
    date: &str,
    resource_type: &str,
    resource_link: &str,
    master_key: &str,
) -> Result<AuthorizationToken> {
    if verb.is_empty() {
        return Err(Error::invalid_argument("verb is required for signing"));
    }
    if date.is_empty() {
        return Err(Error::invalid_argument("date is required for signing"));
    }
    if resource_type.is_empty() {
        return Err(Error::invalid_argument(
            "resource type is required for signing",
        ));
    }
    if resource_link.starts_with('/') || resource_link.contains('?') {
        return Err(Error::invalid_argument(format!(
            "resource link {resource_link:?} must not start with '/' or carry a query"
        )));
    }
    if master_key.is_empty() {
        return Err(Error::invalid_argument("master key is required for signing"));
    }

    let key = base64_decode(master_key)
        .map_err(|e| Error::invalid_credentials("master key is not valid base64").with_source(e))?;

    let string_to_sign = string_to_sign(verb, resource_type, resource_link, date);
    let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());

    let mut token = String::with_capacity(64);
    write!(
        &mut token,
        "type={MASTER_TOKEN_TYPE}&ver={TOKEN_VERSION}&sig={signature}"
    )
    .map_err(|e| Error::unexpected("failed to write authorization token").with_source(e))?;

    Ok(AuthorizationToken(
        utf8_percent_encode(&token, &UNRESERVED_ENCODE_SET).to_string(),
    ))
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// lower(Verb) + "\n" +
/// lower(ResourceType) + "\n" +
/// ResourceLink + "\n" +
/// lower(Date) + "\n" +
/// "" + "\n"
/// ```
///
/// The resource link keeps its case, the store treats ids as case sensitive.
/// The last line is always empty.
pub(crate) fn string_to_sign(
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> String {
    let mut s = String::with_capacity(
        verb.len() + resource_type.len() + resource_link.len() + date.len() + 5,
    );

    s.push_str(&verb.to_lowercase());
    s.push('\n');
    s.push_str(&resource_type.to_lowercase());
    s.push('\n');
    s.push_str(resource_link);
    s.push('\n');
    s.push_str(&date.to_lowercase());
    s.push('\n');
    s.push('\n');

    debug!("string to sign: {:?}", &s);

    s
}
