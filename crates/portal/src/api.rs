use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared_types::{AppError, PortalSettings};

/// Thin JSON client for the portal REST API.
///
/// Attaches the bearer token when one is set and turns error bodies back
/// into [`AppError`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Client for the `api_base_url` of the `[portal]` config section.
    pub fn from_settings(settings: &PortalSettings) -> Self {
        Self::new(settings.api_base_url.as_str())
    }

    /// Same client, authenticated as `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        read_json(self.send(self.request(Method::GET, path)).await?).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, AppError> {
        read_json(self.send(self.request(Method::GET, path).query(query)).await?).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        read_json(self.send(self.request(Method::POST, path).json(body)).await?).await
    }

    /// POST with no body, ignoring any response body.
    pub async fn post_empty(&self, path: &str) -> Result<(), AppError> {
        self.send(self.request(Method::POST, path)).await.map(|_| ())
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        read_json(self.send(self.request(Method::PATCH, path).json(body)).await?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        read_json(self.send(self.request(Method::PUT, path).json(body)).await?).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, AppError> {
        let response = req.send().await.map_err(|e| {
            tracing::warn!(error = %e, "API request failed");
            AppError::external(format!("Request failed: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::from_response_body(&body)
            .unwrap_or_else(|| error_for_status(status.as_u16(), &body)))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    response
        .json()
        .await
        .map_err(|e| AppError::external(format!("Unexpected response: {e}")))
}

/// Fallback when the body is not a structured error.
fn error_for_status(status: u16, body: &str) -> AppError {
    let message = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.trim().to_string()
    };
    match status {
        400 => AppError::bad_request(message),
        401 => AppError::unauthorized(message),
        403 => AppError::forbidden(message),
        404 => AppError::not_found(message),
        409 => AppError::conflict(message),
        500..=599 => AppError::external(message),
        _ => AppError::internal(message),
    }
}
