//! Cookie-based session login against the YouTrack REST API.

use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::rest_url;
use crate::error::{Result, YouTrackError};

/// Represents an authenticated session: the cookie string the tracker handed out on login,
/// echoed back on later requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie: String,
}

impl Session {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    /// Returns the session as a `Cookie` header value.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.cookie)
            .map_err(|err| YouTrackError::Authentication(err.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("cookie", &"<redacted>").finish()
    }
}

/// Logs in with username and password; `None` means the tracker rejected the attempt.
pub async fn login(
    http: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<Option<Session>> {
    let url = rest_url(base_url, &["rest", "user", "login"])?;
    let response = http
        .post(url)
        .form(&[("login", username), ("password", password)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "youtrack login rejected");
        return Ok(None);
    }

    match session_cookie(response.headers()) {
        Some(cookie) => {
            debug!("youtrack login succeeded");
            Ok(Some(Session::new(cookie)))
        }
        None => {
            warn!(%status, "youtrack login response carried no session cookie");
            Ok(None)
        }
    }
}

/// Collects the `name=value` part of every `Set-Cookie` header into a single `Cookie` string.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
