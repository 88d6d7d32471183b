use crate::auth::{self, Session};
use crate::config::{ClientOptions, ProjectConfig};
use crate::error::{Result, YouTrackError};
use crate::models::CreatedIssue;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, LOCATION, USER_AGENT};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use tracing::{debug, warn};

/// HTTP client bound to one project configuration; every authenticated call takes the session it
/// should run under.
#[derive(Clone)]
pub struct YouTrackClient {
    http: HttpClient,
    config: ProjectConfig,
}

impl YouTrackClient {
    pub fn new(config: ProjectConfig, options: &ClientOptions) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(options)?;
        Ok(Self { http, config })
    }

    /// Opens a fresh session with the configured credentials.
    pub async fn login(&self) -> Result<Option<Session>> {
        auth::login(
            &self.http,
            &self.config.base_url,
            &self.config.username,
            &self.config.password,
        )
        .await
    }

    /// Confirms the configured project is visible to the session.
    pub async fn verify_project(&self, session: &Session) -> Result<()> {
        let url = self
            .config
            .endpoint(&["rest", "admin", "project", &self.config.project_id])?;
        let request = self.http.get(url);
        let response = with_session(request, session)?.send().await?;
        debug!(
            status = %response.status(),
            project = %self.config.project_id,
            "youtrack project lookup"
        );
        ensure_success(response).await.map(|_| ())
    }

    /// Creates an issue in the configured project and returns where the tracker placed it.
    pub async fn create_issue(
        &self,
        session: &Session,
        summary: &str,
        description: &str,
    ) -> Result<CreatedIssue> {
        let url = self.config.endpoint(&["rest", "issue"])?;
        let params = [
            ("project", self.config.project_id.as_str()),
            ("summary", summary),
            ("description", description),
        ];
        let request = self.http.put(url).query(&params);
        let response = with_session(request, session)?.send().await?;
        debug!(
            status = %response.status(),
            project = %self.config.project_id,
            "youtrack issue creation"
        );

        let response = ensure_success(response).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(YouTrackError::MissingLocation)?;

        Ok(CreatedIssue {
            youtrack_issue_url: location,
        })
    }
}

fn build_http_client(options: &ClientOptions) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(&options.user_agent)?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .build()
        .map_err(|err| YouTrackError::Other(err.to_string()))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| YouTrackError::Other(err.to_string()))
}

fn with_session(request: RequestBuilder, session: &Session) -> Result<RequestBuilder> {
    Ok(request.header(COOKIE, session.header_value()?))
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%status, "youtrack request failed");
    Err(YouTrackError::http(status, body))
}
