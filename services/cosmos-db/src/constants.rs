use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used by the Cosmos DB REST API.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_CONTINUATION: &str = "x-ms-continuation";

/// REST API version pinned for every request.
pub const COSMOS_API_VERSION: &str = "2018-12-31";

/// Token type for master key authorization.
pub const MASTER_TOKEN_TYPE: &str = "master";
/// Token version for master key authorization.
pub const TOKEN_VERSION: &str = "1.0";

/// Resource type of documents.
pub const RESOURCE_TYPE_DOCS: &str = "docs";

// Env values used by cosmosign.
pub const COSMOS_ACCOUNT_NAME: &str = "COSMOS_ACCOUNT_NAME";
pub const COSMOS_MASTER_KEY: &str = "COSMOS_MASTER_KEY";
pub const COSMOS_ENDPOINT: &str = "COSMOS_ENDPOINT";
pub const COSMOS_TIMEOUT: &str = "COSMOS_TIMEOUT";

/// AsciiSet for the authorization token and for ids placed in a request path.
///
/// Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static UNRESERVED_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
