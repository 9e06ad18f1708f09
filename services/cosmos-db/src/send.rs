use bytes::Bytes;
use cosmosign_core::{Context, Error, ErrorKind, Result};
use tokio::time::{timeout_at, Instant};

/// Fail with `Cancelled` once `deadline` has passed.
pub(crate) fn check_deadline(deadline: Option<Instant>) -> Result<()> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(Error::cancelled(
            "deadline expired before the request was sent",
        )),
        _ => Ok(()),
    }
}

/// Send one request through the context, racing it against `deadline`.
///
/// Transport failures are reported as upstream errors with status 0.
pub(crate) async fn send(
    ctx: &Context,
    req: http::Request<Bytes>,
    deadline: Option<Instant>,
) -> Result<http::Response<Bytes>> {
    check_deadline(deadline)?;

    let resp = match deadline {
        Some(d) => timeout_at(d, ctx.http_send(req))
            .await
            .map_err(|_| Error::cancelled("deadline expired while waiting for the data store"))?,
        None => ctx.http_send(req).await,
    };

    resp.map_err(|e| match e.kind() {
        ErrorKind::Upstream | ErrorKind::Cancelled => e,
        _ => {
            let body = e.to_string();
            Error::upstream(0, body).with_source(e)
        }
    })
}
