use bytes::Bytes;
use cosmosign_core::{Error, Result};
use http::{Method, Uri};
use percent_encoding::{percent_decode_str, utf8_percent_encode};

use crate::constants::{RESOURCE_TYPE_DOCS, UNRESERVED_ENCODE_SET};

/// A request to forward to the data store.
#[derive(Debug, Clone)]
pub struct ForwardTarget {
    /// Absolute uri of the target resource.
    pub uri: Uri,
    /// HTTP method.
    pub method: Method,
    /// Resource type, for example `docs` or `colls`.
    pub resource_type: String,
    /// Resource link, for example `dbs/mydb/colls/mycoll`.
    pub resource_link: String,
    /// Body of the inbound request, only forwarded for `POST`.
    pub body: Option<Bytes>,
}

impl ForwardTarget {
    /// Build a target from an absolute uri, deriving resource type and link from its path.
    pub fn from_uri(method: Method, uri: Uri) -> Result<Self> {
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::invalid_argument(format!(
                "target uri {uri} must be absolute"
            )));
        }

        let (resource_type, resource_link) = parse_resource_path(uri.path())?;
        Ok(Self {
            uri,
            method,
            resource_type,
            resource_link,
            body: None,
        })
    }

    /// Target listing every document of a container.
    ///
    /// `endpoint` is the account base url without trailing slash.
    pub fn list_documents(endpoint: &str, database_id: &str, container_id: &str) -> Result<Self> {
        if database_id.is_empty() {
            return Err(Error::invalid_argument("database id is required"));
        }
        if container_id.is_empty() {
            return Err(Error::invalid_argument("container id is required"));
        }

        let resource_link = format!("dbs/{database_id}/colls/{container_id}");
        let uri: Uri = format!(
            "{endpoint}/dbs/{}/colls/{}/{RESOURCE_TYPE_DOCS}",
            utf8_percent_encode(database_id, &UNRESERVED_ENCODE_SET),
            utf8_percent_encode(container_id, &UNRESERVED_ENCODE_SET),
        )
        .parse()?;

        Ok(Self {
            uri,
            method: Method::GET,
            resource_type: RESOURCE_TYPE_DOCS.to_string(),
            resource_link,
            body: None,
        })
    }

    /// Override the resource type derived from the path.
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = resource_type.into();
        self
    }

    /// Attach the inbound body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Split a request path into resource type and resource link.
///
/// Paths alternate between type and id segments: `dbs/{db}/colls/{coll}/docs/{doc}`.
///
/// - Odd segment count addresses a feed: the last segment is the type and the
///   link is its parent, `dbs/db/colls/coll/docs` => (`docs`, `dbs/db/colls/coll`).
/// - Even segment count addresses an item: the type is the second to last
///   segment and the link is the whole path, `dbs/db` => (`dbs`, `dbs/db`).
///
/// Segments are percent decoded, the store signs over the raw ids.
pub(crate) fn parse_resource_path(path: &str) -> Result<(String, String)> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Err(Error::invalid_argument(
            "request path does not address any resource",
        ));
    }

    let segments = path
        .split('/')
        .map(|v| percent_decode_str(v).decode_utf8_lossy().into_owned())
        .collect::<Vec<_>>();
    if segments.iter().any(|v| v.is_empty()) {
        return Err(Error::invalid_argument(format!(
            "request path {path:?} contains empty segments"
        )));
    }

    let n = segments.len();
    if n % 2 == 1 {
        Ok((segments[n - 1].clone(), segments[..n - 1].join("/")))
    } else {
        Ok((segments[n - 2].clone(), segments.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmosign_core::ErrorKind;
    use test_case::test_case;

    #[test_case("/dbs", "dbs", ""; "database feed")]
    #[test_case("/dbs/mydb", "dbs", "dbs/mydb"; "database")]
    #[test_case("/dbs/mydb/colls", "colls", "dbs/mydb"; "collection feed")]
    #[test_case("/dbs/mydb/colls/Items/docs", "docs", "dbs/mydb/colls/Items"; "document feed")]
    #[test_case("/dbs/mydb/colls/Items/docs/Doc1/", "docs", "dbs/mydb/colls/Items/docs/Doc1"; "document with trailing slash")]
    #[test_case("/dbs/my%20db/colls", "colls", "dbs/my db"; "encoded id")]
    fn test_parse_resource_path(path: &str, resource_type: &str, resource_link: &str) {
        let (t, l) = parse_resource_path(path).unwrap();
        assert_eq!(t, resource_type);
        assert_eq!(l, resource_link);
    }

    #[test_case("/"; "root")]
    #[test_case("/dbs//colls"; "empty segment")]
    fn test_parse_resource_path_invalid(path: &str) {
        let err = parse_resource_path(path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_list_documents_target() {
        let target =
            ForwardTarget::list_documents("https://acct.documents.azure.com", "db", "Items")
                .unwrap();

        assert_eq!(
            target.uri,
            "https://acct.documents.azure.com/dbs/db/colls/Items/docs"
        );
        assert_eq!(target.method, Method::GET);
        assert_eq!(target.resource_type, "docs");
        assert_eq!(target.resource_link, "dbs/db/colls/Items");

        let target =
            ForwardTarget::list_documents("https://acct.documents.azure.com", "my db", "Items")
                .unwrap();
        assert_eq!(
            target.uri,
            "https://acct.documents.azure.com/dbs/my%20db/colls/Items/docs"
        );
        assert_eq!(target.resource_link, "dbs/my db/colls/Items");

        assert!(ForwardTarget::list_documents("https://acct", "", "Items").is_err());
        assert!(ForwardTarget::list_documents("https://acct", "db", "").is_err());
    }

    #[test]
    fn test_from_uri_requires_absolute_uri() {
        let err = ForwardTarget::from_uri(Method::GET, Uri::from_static("/dbs/db")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let target = ForwardTarget::from_uri(
            Method::POST,
            Uri::from_static("https://acct.documents.azure.com/dbs/db/colls/c/docs"),
        )
        .unwrap()
        .with_body(r#"{"id":"a"}"#);
        assert_eq!(target.resource_type, "docs");
        assert_eq!(target.resource_link, "dbs/db/colls/c");
        assert_eq!(target.body.as_deref(), Some(&b"{\"id\":\"a\"}"[..]));
    }
}
