use crate::headers::Headers;
use crate::Error;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use std::borrow::Cow;
use std::fmt;

///
/// A response as returned by a transport or injected through a mock entry.
///
/// The factory never looks inside a response; it stores and forwards it.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }
}

impl Response {
    ///
    /// A `200 OK` response with no headers and an empty body.
    ///
    /// ## Example
    ///
    /// ```
    /// use requestkit::Response;
    /// use http::StatusCode;
    ///
    /// let response = Response::new()
    ///     .with_status(StatusCode::CREATED)
    ///     .with_header("x-request-id", "42")
    ///     .with_body("created");
    ///
    /// assert_eq!(StatusCode::CREATED, response.status());
    /// assert_eq!("created", response.text());
    /// ```
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status code. The default is 200.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets a response header, replacing any header of the same name.
    pub fn with_header(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(field, value);
        self
    }

    /// Adds a response header, keeping any earlier value of the same name.
    pub fn append_header(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(field, value);
        self
    }

    /// Sets the body.
    pub fn with_body<StrOrBytes: AsRef<[u8]>>(mut self, body: StrOrBytes) -> Self {
        self.body = Bytes::copy_from_slice(body.as_ref());
        self
    }

    /// Sets a JSON body along with a `Content-Type: application/json` header.
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.headers.set(CONTENT_TYPE.as_str(), "application/json");
        self.body = Bytes::from(body.to_string());
        self
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to the response headers, for mock callbacks.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Replaces the status code in place, for mock callbacks.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Replaces the body in place, for mock callbacks.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// The raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    ///
    /// Converts into an `http::Response`. Fails when a header isn't valid HTTP.
    ///
    pub fn into_http(self) -> Result<http::Response<Bytes>, Error> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.to_header_map()?;

        Ok(response)
    }
}

impl From<http::Response<Bytes>> for Response {
    fn from(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        let mut headers = Headers::new();

        for (name, value) in parts.headers.iter() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }

        Self {
            status: parts.status,
            headers,
            body,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n{}", self.status, self.headers)
    }
}
