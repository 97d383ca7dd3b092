use crate::response::Response;
use crate::Error;
use bytes::Bytes;
use futures_util::future::BoxFuture;

///
/// Performs real network I/O for requests that aren't served from the mock queue.
///
/// Retries, pooling, TLS and timeouts are the implementor's business; this crate only
/// hands over a fully prepared request.
///
/// ## Example
///
/// ```
/// use bytes::Bytes;
/// use futures_util::future::BoxFuture;
/// use requestkit::{Error, Response, Transport};
///
/// struct Echo;
///
/// impl Transport for Echo {
///     fn send(&self, request: http::Request<Bytes>) -> BoxFuture<'_, Result<Response, Error>> {
///         Box::pin(async move { Ok(Response::new().with_body(request.into_body())) })
///     }
/// }
/// ```
///
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response, or an error built with `Error::transport`.
    fn send(&self, request: http::Request<Bytes>) -> BoxFuture<'_, Result<Response, Error>>;
}
