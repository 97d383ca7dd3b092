///
/// Settings shared by every request a factory produces.
///
/// A configuration is owned by the caller and handed to the factory behind an `Arc`;
/// the factory and its builders only ever read it.
///
/// ## Example
///
/// ```
/// use requestkit::Configuration;
///
/// let configuration = Configuration::new("tenant.example.com")
///     .with_user_agent("my-app/1.0")
///     .with_management_token("secret");
///
/// assert_eq!("https", configuration.scheme());
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    domain: String,
    scheme: String,
    user_agent: Option<String>,
    management_token: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            scheme: "https".to_string(),
            user_agent: None,
            management_token: None,
        }
    }
}

impl Configuration {
    /// A configuration for `domain` with every other setting at its default.
    pub fn new(domain: impl Into<String>) -> Self {
        Self::default().with_domain(domain)
    }

    /// Sets the host (and optional port) requests are sent to.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the URL scheme. Defaults to `https`.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the `User-Agent` header sent with every request that doesn't set its own.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the bearer token used by requests built under the management context.
    pub fn with_management_token(mut self, token: impl Into<String>) -> Self {
        self.management_token = Some(token.into());
        self
    }

    /// The host requests are sent to.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The URL scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The configured `User-Agent`, if any.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// The configured management API token, if any.
    pub fn management_token(&self) -> Option<&str> {
        self.management_token.as_deref()
    }
}
