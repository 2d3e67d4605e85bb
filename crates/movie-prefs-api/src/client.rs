use async_trait::async_trait;
use movie_prefs_config::{BackendConfig, EndpointConfig};
use movie_prefs_models::{Movie, MovieList, PreferenceSnapshot};
use reqwest::cookie::Jar;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::traits::MovieBackend;

const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Deserialize)]
struct CsrfTokenResponse {
    csrf_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    send_all: bool,
}

/// HTTP client for the onboarding backend.
///
/// Requests share one cookie jar so the CSRF cookie set by the token endpoint
/// and the user's session cookie are both sent back on writes.
#[derive(Clone)]
pub struct ReelpickClient {
    client: Client,
    base_url: Url,
    endpoints: EndpointConfig,
}

impl ReelpickClient {
    pub fn new(backend: &BackendConfig, session_id: Option<&str>) -> Result<Self, ApiError> {
        let base_url = Url::parse(&backend.base_url)
            .map_err(|_| ApiError::InvalidUrl(backend.base_url.clone()))?;

        let jar = Arc::new(Jar::default());
        if let Some(session_id) = session_id.filter(|s| !s.trim().is_empty()) {
            jar.add_cookie_str(&format!("sessionid={}", session_id.trim()), &base_url);
        }

        let user_agent = backend
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("reelpick/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(jar)
            .build()?;

        Ok(Self {
            client,
            base_url,
            endpoints: backend.endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::InvalidUrl(path.to_string()))
    }

    /// Fetch a fresh anti-forgery token (also refreshes the CSRF cookie)
    pub async fn csrf_token(&self) -> Result<String, ApiError> {
        let url = self.endpoint(&self.endpoints.csrf_token)?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "fetch CSRF token").await?;
        let body: CsrfTokenResponse = decode(&response.text().await?)?;

        body.csrf_token
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)
    }
}

async fn ensure_success(response: Response, operation: &str) -> Result<Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(operation, status = status.as_u16(), "Backend request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl MovieBackend for ReelpickClient {
    async fn fetch_movies(&self, amount: u32) -> Result<Vec<Movie>, ApiError> {
        let url = self.endpoint(&self.endpoints.movies)?;
        debug!(amount, "Fetching random movies");

        let response = self
            .client
            .get(url)
            .query(&[("amount", amount)])
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = ensure_success(response, "fetch movies").await?;
        let list: MovieList = decode(&response.text().await?)?;

        debug!(count = list.movies.len(), "Fetched random movies");
        Ok(list.movies)
    }

    async fn search_movies(&self, term: &str, send_all: bool) -> Result<Vec<Movie>, ApiError> {
        let token = self.csrf_token().await?;
        let url = self.endpoint(&self.endpoints.search)?;
        debug!(term, send_all, "Searching movies");

        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, token)
            .header("Referer", self.base_url.as_str())
            .json(&SearchRequest { search: term, send_all })
            .send()
            .await?;
        let response = ensure_success(response, "search movies").await?;
        let list: MovieList = decode(&response.text().await?)?;

        debug!(term, count = list.movies.len(), "Search returned movies");
        Ok(list.movies)
    }

    async fn load_preferences(&self) -> Result<PreferenceSnapshot, ApiError> {
        let token = self.csrf_token().await?;
        let url = self.endpoint(&self.endpoints.preferences)?;

        let response = self
            .client
            .get(url)
            .header(CSRF_HEADER, token)
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = ensure_success(response, "load preferences").await?;
        let snapshot: PreferenceSnapshot = decode(&response.text().await?)?;

        debug!(total = snapshot.total(), "Loaded movie preferences");
        Ok(snapshot)
    }

    async fn submit_preferences(&self, snapshot: &PreferenceSnapshot) -> Result<(), ApiError> {
        let token = self.csrf_token().await?;
        let url = self.endpoint(&self.endpoints.submit)?;

        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, token)
            .header("Referer", self.base_url.as_str())
            .json(snapshot)
            .send()
            .await?;
        ensure_success(response, "submit preferences").await?;

        debug!(total = snapshot.total(), "Submitted movie preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            ..BackendConfig::default()
        }
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = ReelpickClient::new(&backend("http://localhost:8000"), None).unwrap();
        assert_eq!(
            client.endpoint("/api/movies/").unwrap().as_str(),
            "http://localhost:8000/api/movies/"
        );
        assert_eq!(
            client.endpoint(&EndpointConfig::default().preferences).unwrap().as_str(),
            "http://localhost:8000/accounts/preferences/movies"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ReelpickClient::new(&backend("not a url"), Some("abc"));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_decode_csrf_token() {
        let body: CsrfTokenResponse = decode(r#"{"csrf_token": "tok"}"#).unwrap();
        assert_eq!(body.csrf_token.as_deref(), Some("tok"));

        let missing: CsrfTokenResponse = decode("{}").unwrap();
        assert!(missing.csrf_token.is_none());

        assert!(matches!(decode::<CsrfTokenResponse>("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_search_request_body() {
        let body = serde_json::to_value(SearchRequest { search: "alien", send_all: true }).unwrap();
        assert_eq!(body, serde_json::json!({"search": "alien", "send_all": true}));
    }
}
