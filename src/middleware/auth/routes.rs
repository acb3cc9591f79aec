//! Which requests skip authentication entirely.
//!
//! Rules are evaluated top to bottom and the first match wins. The order is part
//! of the security contract: e.g. `GET P/api/users/**` is public while every other
//! method on it is not, except the exact `POST P/api/users` registration route.
//!
//! Path tests are plain string prefix/equality checks on the raw request path, so
//! they only hold for paths in normal form (see [`is_normalized`]). Any other path
//! never bypasses.

use axum::http::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatch {
    Any,
    Exact(Method),
}

impl MethodMatch {
    fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatch::Any => true,
            MethodMatch::Exact(expected) => method.as_str().eq_ignore_ascii_case(expected.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    Any,
    Exact(String),
    Prefix(Vec<String>),
    StaticAsset,
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Any => true,
            PathMatch::Exact(expected) => path == expected,
            PathMatch::Prefix(prefixes) => prefixes.iter().any(|p| path.starts_with(p.as_str())),
            PathMatch::StaticAsset => {
                matches!(path, "/" | "/index" | "/index.html")
                    || ["/css/", "/js/", "/images/"].iter().any(|dir| path.contains(dir))
            }
        }
    }
}

/// Percent-encoded dot, slash, backslash, percent, semicolon and NUL.
const ENCODED_SEPARATORS: &[&str] = &["%2e", "%2f", "%5c", "%25", "%3b", "%00"];

/// True if `path` has no dot segments, no empty segments and no encoded or
/// alternative separators, i.e. the raw string means what it says.
///
/// `/app/api/products/../orders` would otherwise match the catalog prefix.
pub fn is_normalized(path: &str) -> bool {
    if !path.starts_with('/') || path.contains("//") {
        return false;
    }
    if path.contains(['\\', ';', '\0']) {
        return false;
    }
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return false;
    }
    let lower = path.to_ascii_lowercase();
    !ENCODED_SEPARATORS.iter().any(|encoded| lower.contains(encoded))
}

/// A bypass rule. `name` is stable and used in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub name: &'static str,
    pub method: MethodMatch,
    pub path: PathMatch,
}

impl RouteRule {
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.matches(method) && self.path.matches(path)
    }
}

#[derive(Debug, Clone)]
pub struct RouteClassifier {
    rules: Vec<RouteRule>,
}

impl RouteClassifier {
    /// `prefix` is what the upstream gateway prepends to API paths (e.g. `/app`, or empty).
    pub fn new(prefix: &str) -> Self {
        let api = |p: &str| format!("{prefix}/api/{p}");

        let rules = vec![
            RouteRule {
                name: "cors-preflight",
                method: MethodMatch::Exact(Method::OPTIONS),
                path: PathMatch::Any,
            },
            RouteRule {
                name: "authenticate",
                method: MethodMatch::Any,
                path: PathMatch::Prefix(vec![api("authenticate")]),
            },
            RouteRule {
                name: "actuator-health-info",
                method: MethodMatch::Any,
                path: PathMatch::Prefix(vec![
                    "/actuator/health".to_string(),
                    "/actuator/info".to_string(),
                ]),
            },
            RouteRule {
                name: "user-registration",
                method: MethodMatch::Exact(Method::POST),
                path: PathMatch::Exact(api("users")),
            },
            RouteRule {
                name: "credential-registration",
                method: MethodMatch::Exact(Method::POST),
                path: PathMatch::Exact(api("credentials")),
            },
            // Public user listing/read. Kept as is; pending product review along
            // with `static-asset` below.
            RouteRule {
                name: "user-read",
                method: MethodMatch::Exact(Method::GET),
                path: PathMatch::Prefix(vec![api("users")]),
            },
            RouteRule {
                name: "catalog-read",
                method: MethodMatch::Exact(Method::GET),
                path: PathMatch::Prefix(vec![api("products"), api("categories")]),
            },
            // Any method, and `contains` rather than a prefix: `DELETE P/api/orders/5/css/x`
            // is public too. Pending product review.
            RouteRule {
                name: "static-asset",
                method: MethodMatch::Any,
                path: PathMatch::StaticAsset,
            },
        ];

        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// First matching bypass rule, if any. Paths not in normal form never match.
    pub fn classify(&self, method: &Method, path: &str) -> Option<&RouteRule> {
        if !is_normalized(path) {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(method, path))
    }

    pub fn should_bypass(&self, method: &Method, path: &str) -> bool {
        self.classify(method, path).is_some()
    }
}
