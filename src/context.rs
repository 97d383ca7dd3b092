use crate::{Error, ErrorKind};
use std::fmt;

///
/// Selects which default header and authorization policy a request builder assumes.
///
/// The numeric codes are part of the public contract and never change.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperatingContext {
    /// Plain requests with no context specific policy.
    Generic = 1,
    /// Requests against the authentication API. This is the default.
    #[default]
    Authentication = 2,
    /// Requests against the management API. A configured management token is sent
    /// as a bearer `Authorization` header.
    Management = 3,
}

impl OperatingContext {
    /// The stable numeric code of this context.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<OperatingContext> for u8 {
    fn from(context: OperatingContext) -> Self {
        context.code()
    }
}

impl TryFrom<u8> for OperatingContext {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OperatingContext::Generic),
            2 => Ok(OperatingContext::Authentication),
            3 => Ok(OperatingContext::Management),
            other => Err(Error::new_with_context(ErrorKind::InvalidContext, other)),
        }
    }
}

impl fmt::Display for OperatingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatingContext::Generic => "generic",
            OperatingContext::Authentication => "authentication",
            OperatingContext::Management => "management",
        };
        f.write_str(name)
    }
}
