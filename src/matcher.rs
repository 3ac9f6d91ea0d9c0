//! Path resolution.
//!
//! Recursive descent over the route tree, one request segment at a time.
//! Siblings are tried in declaration order and the first one that yields a
//! handler wins, so a literal registered after a `{name}` sibling is never
//! reached for the segments the wildcard accepts.

use std::fmt;

use glob::{MatchOptions, Pattern};
use tracing::{trace, warn};

use crate::engine::RequestEngine;
use crate::handler::SharedHandler;
use crate::method::Method;
use crate::params::{PLACEHOLDER, split_path};
use crate::router::{Route, SharedMiddleware};

const SEGMENT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

// ── Segments ──────────────────────────────────────────────────────────────────

/// One `/`-delimited piece of a node's path.
#[derive(Clone, Debug)]
pub(crate) enum Segment {
    Literal(String),
    /// Contains at least one `{name}`. Each placeholder is a glob `*`; the
    /// literal text around it is escaped. `glob` is `None` only if the
    /// pattern failed to compile, in which case the raw text must match.
    Dynamic { raw: String, glob: Option<Pattern> },
}

impl Segment {
    pub(crate) fn parse_path(path: &str) -> Vec<Segment> {
        split_path(path).into_iter().map(Segment::parse).collect()
    }

    fn parse(raw: &str) -> Self {
        if !PLACEHOLDER.is_match(raw) {
            return Self::Literal(raw.to_owned());
        }

        let mut glob = String::with_capacity(raw.len());
        let mut last = 0;
        for placeholder in PLACEHOLDER.find_iter(raw) {
            glob.push_str(&Pattern::escape(&raw[last..placeholder.start()]));
            // `**` is not a valid segment glob; back-to-back placeholders share one `*`.
            if !glob.ends_with('*') {
                glob.push('*');
            }
            last = placeholder.end();
        }
        glob.push_str(&Pattern::escape(&raw[last..]));

        let glob = match Pattern::new(&glob) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(segment = raw, error = %e, "dynamic segment will only match literally");
                None
            }
        };
        Self::Dynamic { raw: raw.to_owned(), glob }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::Literal(raw) | Self::Dynamic { raw, .. } => raw,
        }
    }

    pub(crate) fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Dynamic { glob: Some(pattern), .. } => pattern.matches_with(segment, SEGMENT_MATCH),
            Self::Literal(raw) | Self::Dynamic { raw, glob: None } => raw == segment,
        }
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// A successful lookup: the handler, the path it was registered under, and
/// the middlewares met on the way down.
pub struct Resolved<'r, E: RequestEngine + ?Sized> {
    pub handler: &'r SharedHandler<E>,
    /// The matched path in registration form, root to leaf, e.g.
    /// `/abc/{myVar}/def`. `"/"` when the root itself matched.
    pub parameterised_path: String,
    /// Leaf first, root last. Applying them in this order leaves the root's
    /// middlewares outermost.
    pub middlewares: Vec<&'r SharedMiddleware<E>>,
}

impl<E: RequestEngine + ?Sized> fmt::Debug for Resolved<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("parameterised_path", &self.parameterised_path)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl<E: RequestEngine + ?Sized> Route<E> {
    /// Resolves `path` and `method` against this tree.
    ///
    /// Empty segments in `path` are ignored, so `//a/b/` resolves like
    /// `/a/b`. Returns `None` both when no node matches the path and when
    /// the matching node has no handler for `method`.
    pub fn find(&self, path: &str, method: Method) -> Option<Resolved<'_, E>> {
        let segments = split_path(path);
        let mut trail = Vec::new();
        let Some(handler) = self.descend(&segments, method, &mut trail) else {
            trace!(path, %method, "no route");
            return None;
        };

        let mut parameterised_path = String::new();
        for segment in trail.iter().rev().copied().flat_map(|node| node.segments.iter()) {
            parameterised_path.push('/');
            parameterised_path.push_str(segment.as_str());
        }
        if parameterised_path.is_empty() {
            parameterised_path.push('/');
        }

        let middlewares = trail.iter().copied().flat_map(|node| node.middlewares.iter()).collect();
        trace!(path, %method, route = %parameterised_path, "route found");

        Some(Resolved { handler, parameterised_path, middlewares })
    }

    /// Pushes every node on the winning branch onto `trail`, leaf first.
    fn descend<'r>(
        &'r self,
        segments: &[&str],
        method: Method,
        trail: &mut Vec<&'r Route<E>>,
    ) -> Option<&'r SharedHandler<E>> {
        let rest = self.consume(segments)?;

        let mut found = if rest.is_empty() { self.handler(method) } else { None };
        if found.is_none() {
            found = self
                .children
                .iter()
                .find_map(|child| child.descend(rest, method, trail));
        }

        if found.is_some() {
            trail.push(self);
        }
        found
    }

    /// Matches this node's own segments against the front of `segments` and
    /// returns what is left.
    fn consume<'p, 's>(&self, segments: &'p [&'s str]) -> Option<&'p [&'s str]> {
        if self.is_transparent() {
            return Some(segments);
        }
        if segments.len() < self.segments.len() {
            return None;
        }
        let (head, rest) = segments.split_at(self.segments.len());
        self.segments
            .iter()
            .zip(head)
            .all(|(pattern, segment)| pattern.matches(segment))
            .then_some(rest)
    }
}
