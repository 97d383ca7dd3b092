use crate::error::Failure;
use crate::request::PreparedRequest;
use crate::response::Response;
use crate::Error;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

///
/// Invoked when a mock entry is consumed, with the request being dispatched and a copy of
/// the canned response that it may inspect or modify before it is returned.
///
pub type MockCallback = Arc<dyn Fn(&PreparedRequest, &mut Response) + Send + Sync + 'static>;

///
/// A canned result standing in for one executed request.
///
/// Entries are only created through the factory's registration methods and are never
/// modified once queued.
///
#[derive(Clone)]
pub struct MockEntry {
    response: Response,
    callback: Option<MockCallback>,
    failure: Option<Failure>,
}

impl MockEntry {
    pub(crate) fn new(
        response: Response,
        callback: Option<MockCallback>,
        failure: Option<Failure>,
    ) -> Self {
        Self {
            response,
            callback,
            failure,
        }
    }

    /// The canned response.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// The callback run at dispatch time, if any.
    pub fn callback(&self) -> Option<&MockCallback> {
        self.callback.as_ref()
    }

    /// The simulated failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    ///
    /// Produces the result of a request served by this entry: the callback sees the
    /// request and a copy of the response first, then an injected failure wins over
    /// the response.
    ///
    pub fn resolve(&self, request: &PreparedRequest) -> Result<Response, Error> {
        let mut response = self.response.clone();

        if let Some(callback) = &self.callback {
            callback(request, &mut response);
        }

        match &self.failure {
            Some(failure) => Err(Error::from_failure(failure.clone())),
            None => Ok(response),
        }
    }
}

impl fmt::Debug for MockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockEntry")
            .field("response", &self.response)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .field("failure", &self.failure.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl fmt::Display for MockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response)?;
        if self.callback.is_some() {
            f.write_str("(callback)\r\n")?;
        }
        if let Some(failure) = &self.failure {
            write!(f, "(failure: {})\r\n", failure)?;
        }

        Ok(())
    }
}

///
/// A composite mock description for `ClientFactory::register_mock_responses`. Records
/// without a response are skipped when registered.
///
#[derive(Clone, Default)]
pub struct MockRecord {
    /// The canned response. Required for the record to be queued.
    pub response: Option<Response>,
    /// Run at dispatch time.
    pub callback: Option<MockCallback>,
    /// Returned as an error at dispatch time.
    pub failure: Option<Failure>,
}

impl MockRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canned response.
    pub fn with_response(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }

    /// Sets the dispatch callback.
    pub fn with_callback(
        mut self,
        callback: impl Fn(&PreparedRequest, &mut Response) + Send + Sync + 'static,
    ) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Sets the simulated failure.
    pub fn with_failure(
        mut self,
        failure: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.failure = Some(Arc::new(failure));
        self
    }
}

impl fmt::Debug for MockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRecord")
            .field("response", &self.response)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .field("failure", &self.failure.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

///
/// One element of a bulk mock registration: either a bare response or a composite record.
///
#[derive(Clone, Debug)]
pub enum MockInput {
    /// A response with no callback and no failure.
    Response(Response),
    /// A response with an optional callback and failure.
    Record(MockRecord),
}

impl MockInput {
    pub(crate) fn into_record(self) -> MockRecord {
        match self {
            MockInput::Response(response) => MockRecord::new().with_response(response),
            MockInput::Record(record) => record,
        }
    }
}

impl From<Response> for MockInput {
    fn from(response: Response) -> Self {
        MockInput::Response(response)
    }
}

impl From<MockRecord> for MockInput {
    fn from(record: MockRecord) -> Self {
        MockInput::Record(record)
    }
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<Arc<MockEntry>>,
    consumed: usize,
}

///
/// The ordered mock entries a factory feeds into its builders.
///
/// Cloning a queue yields another handle to the same entries, so entries pushed after a
/// builder was created are still served to it. Entries are never removed: consuming one
/// only advances a cursor, which keeps the full registration history readable.
///
#[derive(Clone, Debug, Default)]
pub struct MockQueue {
    state: Arc<RwLock<State>>,
}

impl MockQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, entry: MockEntry) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.push(Arc::new(entry));
    }

    ///
    /// Takes the oldest entry that hasn't been served yet.
    ///
    pub fn next(&self) -> Option<Arc<MockEntry>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let entry = state.entries.get(state.consumed).cloned()?;
        state.consumed += 1;

        Some(entry)
    }

    /// Every entry ever queued, in insertion order.
    pub fn entries(&self) -> Vec<Arc<MockEntry>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.clone()
    }

    /// The entries not yet served, in the order they will be served.
    pub fn remaining(&self) -> Vec<Arc<MockEntry>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries[state.consumed..].to_vec()
    }

    /// The number of entries ever queued.
    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.len()
    }

    /// Whether nothing was ever queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` is a handle to the same entries.
    pub fn ptr_eq(&self, other: &MockQueue) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
