//! The request-side collaborator.

use std::collections::HashMap;

use crate::error::Error;

/// Supplies request data to handlers and shapes the final response.
///
/// ramus never sees a socket, a Lambda event, or a status code. An adapter
/// for your transport implements this trait; the pipeline reads the path and
/// verb from it, hands it to every handler phase, and calls
/// [`format_output`](RequestEngine::format_output) exactly once per request.
pub trait RequestEngine {
    /// What handlers produce and post-execution transforms.
    type Output;
    /// What the formatting call turns an outcome into.
    type Response;

    fn path(&self) -> &str;
    fn verb(&self) -> &str;
    fn body(&self) -> &[u8];
    fn headers(&self) -> &HashMap<String, String>;
    fn query_params(&self) -> &HashMap<String, String>;

    /// Turns the pipeline outcome into the response value.
    ///
    /// Inspect `Err(Error::Router(_))` to tell routing failures apart from
    /// errors a handler returned itself.
    fn format_output(&self, outcome: Result<Self::Output, Error>) -> Self::Response;

    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params().get(key).map(String::as_str)
    }
}
