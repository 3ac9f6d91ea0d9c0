//! The verb set a route node can hold handlers for.
//!
//! Six verbs, fixed. A request whose verb is not one of these never matches
//! anything and comes back as not-found.

use std::fmt;
use std::str::FromStr;

/// A routable HTTP verb.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl Method {
    /// Every verb, in handler-table order.
    pub const ALL: [Method; 6] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
    ];

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get    => "GET",
            Self::Post   => "POST",
            Self::Put    => "PUT",
            Self::Delete => "DELETE",
            Self::Patch  => "PATCH",
            Self::Head   => "HEAD",
        }
    }

    /// Slot in a node's handler table.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Get    => 0,
            Self::Post   => 1,
            Self::Put    => 2,
            Self::Delete => 3,
            Self::Patch  => 4,
            Self::Head   => 5,
        }
    }
}

/// Returned when a verb string is outside the routable set.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unsupported verb `{0}`")]
pub struct UnsupportedMethod(pub String);

/// Parses an uppercase verb string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET"    => Ok(Self::Get),
            "POST"   => Ok(Self::Post),
            "PUT"    => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH"  => Ok(Self::Patch),
            "HEAD"   => Ok(Self::Head),
            _        => Err(UnsupportedMethod(s.to_owned())),
        }
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = UnsupportedMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get    => http::Method::GET,
            Method::Post   => http::Method::POST,
            Method::Put    => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
            Method::Patch  => http::Method::PATCH,
            Method::Head   => http::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
