//! The API gateway in front of the analytics backend.
//!
//! Any path under the prefix is forwarded to the configured backend with the
//! origin swapped. The backend host never appears in code, only in
//! configuration.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("path {path} is not under the gateway prefix {prefix}")]
    Unrouted { path: String, prefix: String },
    #[error("cannot build backend url for {path}: {source}")]
    Join {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Maps API paths onto the backend origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gateway {
    base_url: Url,
    prefix: String,
}

impl Gateway {
    /// `prefix` is normalized to start with `/` and carry no trailing `/`.
    pub fn new(base_url: Url, prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_end_matches('/');
        let prefix = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { base_url, prefix }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `path` falls under the prefix (segment-wise, so `/apix` is not
    /// under `/api`).
    pub fn routes(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }

    /// Rewrite `path` onto the backend origin.
    ///
    /// Any path already present on the base URL is kept, so a backend mounted
    /// at `https://host/service` receives `https://host/service/api/...`.
    pub fn route(&self, path: &str) -> Result<Url, GatewayError> {
        if !self.routes(path) {
            return Err(GatewayError::Unrouted {
                path: path.to_string(),
                prefix: self.prefix.clone(),
            });
        }

        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|source| GatewayError::Join {
                path: path.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gateway(base: &str) -> Gateway {
        Gateway::new(Url::parse(base).unwrap(), "/api")
    }

    #[test]
    fn test_route_rewrites_origin() {
        let url = gateway("https://backend.example.run.app").route("/api/github").unwrap();
        assert_eq!(url.as_str(), "https://backend.example.run.app/api/github");
    }

    #[test]
    fn test_route_keeps_base_path() {
        let url = gateway("http://127.0.0.1:5000/flask").route("/api/github").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/flask/api/github");
    }

    #[test]
    fn test_paths_outside_prefix_are_rejected() {
        let gw = gateway("http://127.0.0.1:5000");
        assert!(!gw.routes("/apix/github"));
        assert!(!gw.routes("/static/app.js"));
        assert!(matches!(
            gw.route("/static/app.js"),
            Err(GatewayError::Unrouted { .. })
        ));
    }

    #[test]
    fn test_prefix_is_normalized() {
        let gw = Gateway::new(Url::parse("http://localhost").unwrap(), "api/");
        assert_eq!(gw.prefix(), "/api");
        assert!(gw.routes("/api"));
        assert!(gw.routes("/api/github"));
    }
}
