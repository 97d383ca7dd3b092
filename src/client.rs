use crate::configuration::Configuration;
use crate::context::OperatingContext;
use crate::error::Failure;
use crate::headers::Headers;
use crate::mock::{MockCallback, MockEntry, MockInput, MockQueue};
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::transport::Transport;
use http::header::CONTENT_TYPE;
use std::fmt;
use std::sync::Arc;

const JSON_METHODS: [&str; 4] = ["post", "put", "patch", "delete"];

///
/// Produces request builders that share one configuration, operating context, base path,
/// set of default headers and mock queue.
///
/// A factory is meant to be driven from a single call sequence. Callers that need
/// concurrent use should create one factory per task.
///
/// ## Example
///
/// ```
/// use requestkit::{ClientFactory, Configuration, OperatingContext};
/// use std::sync::Arc;
///
/// let configuration = Arc::new(Configuration::new("tenant.example.com"));
/// let mut factory = ClientFactory::new(configuration)
///     .context(OperatingContext::Management)
///     .base_path("/api/v2")
///     .default_headers(vec![("x-tenant", "acme")]);
///
/// let request = factory.begin_request("POST").add_path("users");
///
/// assert_eq!("post", request.method());
/// assert_eq!(Some("application/json"), request.headers().get("content-type"));
/// assert_eq!(Some("acme"), request.headers().get("x-tenant"));
/// ```
///
pub struct ClientFactory {
    configuration: Arc<Configuration>,
    context: OperatingContext,
    base_path: String,
    headers: Headers,
    mocks: MockQueue,
    transport: Option<Arc<dyn Transport>>,
    last_request: Option<RequestBuilder>,
}

impl ClientFactory {
    ///
    /// A factory under the authentication context, rooted at `/`, with no default headers
    /// and no transport.
    ///
    pub fn new(configuration: Arc<Configuration>) -> Self {
        Self {
            configuration,
            context: OperatingContext::default(),
            base_path: "/".to_string(),
            headers: Headers::new(),
            mocks: MockQueue::new(),
            transport: None,
            last_request: None,
        }
    }

    /// Sets the operating context.
    pub fn context(mut self, context: OperatingContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the path every request starts from. Defaults to `/`.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Replaces the default headers applied to every request.
    pub fn default_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers.into_iter().collect();
        self
    }

    /// Sets the transport used for requests not served from the mock queue.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    ///
    /// Adds a default header applied to requests started from now on.
    ///
    pub fn add_default_header(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.headers.set(field, value);
        self
    }

    ///
    /// Starts a new request. The method is lowercased and otherwise accepted as is.
    ///
    /// `post`, `put`, `patch` and `delete` requests get `Content-Type: application/json`
    /// before the default headers are applied, so a default `Content-Type` wins.
    ///
    /// The returned builder also becomes the factory's last request.
    ///
    pub fn begin_request(&mut self, method: &str) -> RequestBuilder {
        let method = method.to_lowercase();
        let is_json = JSON_METHODS.contains(&method.as_str());

        let mut builder = RequestBuilder::new(
            self.configuration.clone(),
            self.context,
            method,
            self.base_path.clone(),
            self.mocks.clone(),
            self.transport.clone(),
        );

        if is_json {
            builder = builder.with_header(CONTENT_TYPE.as_str(), "application/json");
        }

        let builder = builder.with_headers(self.headers.iter());

        log::debug!("Beginning {} request {}", self.context, builder);

        self.last_request = Some(builder.clone());
        builder
    }

    ///
    /// A clone of the builder returned by the latest `begin_request` call, taken when it was
    /// handed out. Paths, parameters, headers or a body added afterwards to the caller's
    /// copy are not reflected here.
    ///
    /// Both copies share the record of the dispatched request, so `last_sent()` on the
    /// returned builder shows what the caller eventually sent.
    ///
    /// ## Example
    ///
    /// ```
    /// use requestkit::{ClientFactory, Configuration, Response};
    /// use std::sync::Arc;
    ///
    /// # futures::executor::block_on(async {
    /// let mut factory = ClientFactory::new(Arc::new(Configuration::default()));
    /// factory.register_mock_response(Response::new(), None, None);
    ///
    /// let request = factory.begin_request("GET").add_path("users");
    /// assert_eq!("/", factory.last_request().unwrap().path());
    ///
    /// request.call().await.unwrap();
    /// let sent = factory.last_request().unwrap().last_sent().unwrap();
    /// assert_eq!("/users", sent.path());
    /// # });
    /// ```
    ///
    pub fn last_request(&self) -> Option<&RequestBuilder> {
        self.last_request.as_ref()
    }

    ///
    /// Queues a canned response. `callback` runs when the entry is consumed and `failure`
    /// is returned as an error instead of the response.
    ///
    /// ## Example
    ///
    /// ```
    /// use requestkit::{ClientFactory, Configuration, Response};
    /// use std::sync::Arc;
    ///
    /// let mut factory = ClientFactory::new(Arc::new(Configuration::default()));
    /// factory
    ///     .register_mock_response(Response::new().with_body("a"), None, None)
    ///     .register_mock_response(Response::new().with_body("b"), None, None);
    ///
    /// assert_eq!(2, factory.mock_queue().len());
    /// ```
    ///
    pub fn register_mock_response(
        &mut self,
        response: Response,
        callback: Option<MockCallback>,
        failure: Option<Failure>,
    ) -> &mut Self {
        log::debug!(
            "Registering mocked response {} (callback: {}, failure: {})",
            response.status(),
            callback.is_some(),
            failure.is_some()
        );

        self.mocks.push(MockEntry::new(response, callback, failure));
        self
    }

    ///
    /// Queues several canned responses in order. Each element is either a bare `Response`
    /// or a `MockRecord`:
    ///
    /// - records without a response are skipped;
    /// - when a record carries both a callback and a failure, only the callback is kept.
    ///
    pub fn register_mock_responses<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<MockInput>,
    {
        for input in entries {
            let input: MockInput = input.into();
            let record = input.into_record();

            let Some(response) = record.response else {
                log::debug!("Skipping mock record without a response");
                continue;
            };

            match (record.callback, record.failure) {
                (Some(callback), _) => self.register_mock_response(response, Some(callback), None),
                (None, failure) => self.register_mock_response(response, None, failure),
            };
        }

        self
    }

    /// The shared configuration.
    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    /// The operating context handed to every builder.
    pub fn operating_context(&self) -> OperatingContext {
        self.context
    }

    /// The path every request starts from.
    pub fn path(&self) -> &str {
        &self.base_path
    }

    /// The default headers applied to every request.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The queue shared with every builder.
    pub fn mock_queue(&self) -> &MockQueue {
        &self.mocks
    }
}

impl fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFactory")
            .field("configuration", &self.configuration)
            .field("context", &self.context)
            .field("base_path", &self.base_path)
            .field("headers", &self.headers)
            .field("mocks", &self.mocks.len())
            .field("transport", &self.transport.is_some())
            .field("last_request", &self.last_request)
            .finish()
    }
}
