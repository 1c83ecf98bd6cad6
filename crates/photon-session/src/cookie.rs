//! Cookie value type.

use serde::{Deserialize, Serialize};

/// Name of the synthetic cookie carrying a bootstrap access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// A single cookie held by the session.
///
/// Identity is `(name, domain, path)`; merging a cookie with an existing
/// identity replaces it, anything else is appended. Serialized camelCase to
/// stay compatible with cookie files exported from a browser profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub same_site: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

impl Cookie {
    /// Create a plain cookie with just name/value/domain/path.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Create the synthetic access-token cookie granting API access.
    pub fn access_token(token: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: ACCESS_TOKEN_COOKIE.to_string(),
            value: token.into(),
            domain: domain.into(),
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: Some("None".to_string()),
        }
    }

    /// The merge identity of this cookie.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.name, &self.domain, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let cookie = Cookie::access_token("tok", "api.example.com");
        let json = serde_json::to_value(&cookie).unwrap();

        assert_eq!(json["name"], "access_token");
        assert_eq!(json["httpOnly"], true);
        assert_eq!(json["sameSite"], "None");
    }

    #[test]
    fn test_deserializes_sparse_response_cookie() {
        // Cookies observed from responses carry only name/value/domain/path.
        let cookie: Cookie = serde_json::from_str(
            r#"{"name": "sid", "value": "abc", "domain": ".example.com", "path": "/"}"#,
        )
        .unwrap();

        assert_eq!(cookie.identity(), ("sid", ".example.com", "/"));
        assert!(!cookie.secure);
        assert!(cookie.same_site.is_none());
    }
}
