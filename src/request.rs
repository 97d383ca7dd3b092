use crate::configuration::Configuration;
use crate::context::OperatingContext;
use crate::headers::Headers;
use crate::mock::MockQueue;
use crate::response::Response;
use crate::transport::Transport;
use crate::{Error, ErrorKind};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{Method, Uri};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Bytes escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

///
/// A request in the exact shape it is handed to a mock entry or to the transport.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    method: Method,
    uri: Uri,
    headers: Headers,
    body: Bytes,
}

impl PreparedRequest {
    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The path part of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The query part of the URI, if any.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// The request headers, including the ones added by the operating context.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The request body. Empty when none was set.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Converts into an `http::Request`. Fails when a header isn't valid HTTP.
    pub fn into_http(self) -> Result<http::Request<Bytes>, Error> {
        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers.to_header_map()?;

        Ok(request)
    }
}

impl fmt::Display for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\r\n{} {}\r\n{}", self.method, self.uri, self.headers)
    }
}

///
/// Accumulates the details of one request and executes it, either against the mock queue
/// or through the transport. Should be obtained via `ClientFactory::begin_request()`.
///
/// Clones share the record of the last dispatched request, so the copy kept by the
/// factory as its last request observes what the caller eventually sent.
///
#[derive(Clone)]
pub struct RequestBuilder {
    configuration: Arc<Configuration>,
    context: OperatingContext,
    method: String,
    base_path: String,
    segments: Vec<String>,
    params: Vec<(String, String)>,
    headers: Headers,
    body: Option<Bytes>,
    mocks: MockQueue,
    transport: Option<Arc<dyn Transport>>,
    last_sent: Arc<RwLock<Option<PreparedRequest>>>,
}

impl RequestBuilder {
    pub(crate) fn new(
        configuration: Arc<Configuration>,
        context: OperatingContext,
        method: String,
        base_path: String,
        mocks: MockQueue,
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self {
            configuration,
            context,
            method,
            base_path,
            segments: Vec::new(),
            params: Vec::new(),
            headers: Headers::new(),
            body: None,
            mocks,
            transport,
            last_sent: Arc::new(RwLock::new(None)),
        }
    }

    ///
    /// Appends one path segment after the base path. The segment is percent-encoded as a
    /// whole, so `/`, `?`, `#` and spaces stay inside it. Empty segments are ignored.
    ///
    /// ## Example
    ///
    /// ```
    /// use requestkit::{ClientFactory, Configuration};
    /// use std::sync::Arc;
    ///
    /// let mut factory = ClientFactory::new(Arc::new(Configuration::new("tenant.example.com")))
    ///     .base_path("/api/v2/");
    ///
    /// let request = factory.begin_request("GET").add_path("users").add_path("auth0|42");
    /// assert_eq!("/api/v2/users/auth0|42", request.path());
    ///
    /// let request = factory.begin_request("GET").add_path("roles").add_path("a/b c");
    /// assert_eq!("/api/v2/roles/a%2Fb%20c", request.path());
    /// ```
    ///
    pub fn add_path(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Adds a query parameter. Parameters are encoded in the order they were added.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Sets a request header, replacing any header of the same name.
    pub fn with_header(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(field, value);
        self
    }

    /// Sets every header of `headers` in order; later values win.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.merge(headers);
        self
    }

    /// Sets the raw request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    ///
    /// Serializes `body` as the JSON request body and sets `Content-Type: application/json`.
    ///
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(body)
            .map_err(|e| Error::new_with_context(ErrorKind::RequestBodyFailure, e))?;
        self.headers.set(CONTENT_TYPE.as_str(), "application/json");
        self.body = Some(Bytes::from(body));

        Ok(self)
    }

    /// The lowercase method this request was started with.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The operating context inherited from the factory.
    pub fn context(&self) -> OperatingContext {
        self.context
    }

    /// The shared configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The base path inherited from the factory.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The headers set so far, without the ones added by the operating context.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body set so far.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The mock queue shared with the factory.
    pub fn mock_queue(&self) -> &MockQueue {
        &self.mocks
    }

    ///
    /// The base path joined with the encoded segments. Empty parts and duplicate slashes
    /// of the base path are dropped.
    ///
    pub fn path(&self) -> String {
        let base = self.base_path.split('/').map(ToString::to_string);
        let segments = self
            .segments
            .iter()
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string());
        let parts: Vec<String> = base
            .chain(segments)
            .filter(|part| !part.is_empty())
            .collect();

        format!("/{}", parts.join("/"))
    }

    /// The absolute URL including the encoded query string.
    pub fn url(&self) -> Result<String, Error> {
        let mut url = format!(
            "{}://{}{}",
            self.configuration.scheme(),
            self.configuration.domain(),
            self.path()
        );

        if !self.params.is_empty() {
            let query = serde_urlencoded::to_string(&self.params)
                .map_err(|e| Error::new_with_context(ErrorKind::InvalidUri, e))?;
            url.push('?');
            url.push_str(&query);
        }

        Ok(url)
    }

    ///
    /// Builds the request as it will be dispatched, adding the headers required by the
    /// operating context.
    ///
    pub fn prepare(&self) -> Result<PreparedRequest, Error> {
        let method = Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|_| Error::new_with_context(ErrorKind::InvalidMethod, &self.method))?;

        let url = self.url()?;
        let uri = url
            .parse::<Uri>()
            .map_err(|_| Error::new_with_context(ErrorKind::InvalidUri, &url))?;

        let mut headers = self.headers.clone();

        if let Some(user_agent) = self.configuration.user_agent() {
            if !headers.contains(USER_AGENT.as_str()) {
                headers.set(USER_AGENT.as_str(), user_agent);
            }
        }

        if self.context == OperatingContext::Management {
            if let Some(token) = self.configuration.management_token() {
                if !headers.contains(AUTHORIZATION.as_str()) {
                    headers.set(AUTHORIZATION.as_str(), format!("Bearer {}", token));
                }
            }
        }

        Ok(PreparedRequest {
            method,
            uri,
            headers,
            body: self.body.clone().unwrap_or_default(),
        })
    }

    ///
    /// Executes the request. The next unconsumed mock entry is served when there is one,
    /// otherwise the request goes through the transport.
    ///
    /// ## Example
    ///
    /// ```
    /// use requestkit::{ClientFactory, Configuration, Response};
    /// use std::sync::Arc;
    ///
    /// # futures::executor::block_on(async {
    /// let mut factory = ClientFactory::new(Arc::new(Configuration::new("tenant.example.com")));
    /// factory.register_mock_response(Response::new().with_body("hello"), None, None);
    ///
    /// let response = factory.begin_request("GET").call().await.unwrap();
    /// assert_eq!("hello", response.text());
    /// # });
    /// ```
    ///
    pub async fn call(&self) -> Result<Response, Error> {
        let request = self.prepare()?;
        *self.last_sent.write().unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        if let Some(entry) = self.mocks.next() {
            log::debug!("Serving mocked response for {}", request);
            return entry.resolve(&request);
        }

        match &self.transport {
            Some(transport) => {
                log::debug!("Sending {}", request);
                transport.send(request.into_http()?).await
            }
            None => Err(Error::new_with_context(
                ErrorKind::NoTransport,
                format!("{} {}", request.method(), request.uri()),
            )),
        }
    }

    ///
    /// The last request dispatched by this builder or any of its clones.
    ///
    pub fn last_sent(&self) -> Option<PreparedRequest> {
        self.last_sent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("context", &self.context)
            .field("method", &self.method)
            .field("path", &self.path())
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("mocks", &self.mocks.len())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl fmt::Display for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\r\n{} {}\r\n{}",
            self.method.to_uppercase(),
            self.path(),
            self.headers
        )
    }
}
