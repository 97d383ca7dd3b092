use std::error::Error as ErrorTrait;
use std::fmt::Display;
use std::sync::Arc;

///
/// An opaque error injected through a mock entry. It is stored and handed back verbatim
/// as the `source()` of the [`Error`] returned when the entry is consumed.
///
pub type Failure = Arc<dyn ErrorTrait + Send + Sync + 'static>;

///
/// Contains information about an error occurence
///
#[derive(Debug)]
pub struct Error {
    /// The type of this error
    pub kind: ErrorKind,
    /// Some errors come with more context
    pub context: Option<String>,
    source: Option<Failure>,
}

impl Error {
    ///
    /// Builds an error of the given kind with no context.
    ///
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            kind,
            context: None,
            source: None,
        }
    }

    pub(crate) fn new_with_context(kind: ErrorKind, context: impl Display) -> Error {
        Error {
            kind,
            context: Some(context.to_string()),
            source: None,
        }
    }

    pub(crate) fn from_failure(failure: Failure) -> Error {
        Error {
            kind: ErrorKind::MockedFailure,
            context: Some(failure.to_string()),
            source: Some(failure),
        }
    }

    ///
    /// Builds an error for a `Transport` implementation to return when the request
    /// could not be delivered.
    ///
    pub fn transport(context: impl Display) -> Error {
        Error::new_with_context(ErrorKind::TransportFailure, context)
    }

    ///
    /// The failure value injected through a mock entry, if this error came from one.
    ///
    pub fn failure(&self) -> Option<&Failure> {
        self.source.as_ref()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (context: {})",
            self.kind.description(),
            self.context.as_deref().unwrap_or("none")
        )
    }
}

impl ErrorTrait for Error {
    fn source(&self) -> Option<&(dyn ErrorTrait + 'static)> {
        self.source
            .as_ref()
            .map(|failure| &**failure as &(dyn ErrorTrait + 'static))
    }
}

///
/// The type of an error
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A mock entry carried a simulated failure
    MockedFailure,
    /// No mock entry remained and no transport was configured
    NoTransport,
    /// The method is not a valid HTTP token
    InvalidMethod,
    /// The request URL could not be parsed
    InvalidUri,
    /// A header name or value is not valid HTTP
    InvalidHeader,
    /// Failed to serialize the request body
    RequestBodyFailure,
    /// The transport could not deliver the request
    TransportFailure,
    /// The numeric code does not name an operating context
    InvalidContext,
}

impl ErrorKind {
    fn description(&self) -> &'static str {
        match self {
            ErrorKind::MockedFailure => "a mocked failure was injected",
            ErrorKind::NoTransport => "no mocked response left and no transport configured",
            ErrorKind::InvalidMethod => "invalid request method",
            ErrorKind::InvalidUri => "invalid request uri",
            ErrorKind::InvalidHeader => "invalid header",
            ErrorKind::RequestBodyFailure => "failed to serialize the request body",
            ErrorKind::TransportFailure => "the transport could not deliver the request",
            ErrorKind::InvalidContext => "unknown operating context",
        }
    }
}
