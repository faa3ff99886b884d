//! Marathon HTTP client

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::backend::marathon::types::ErrorBody;
use crate::config::BasicAuthSettings;
use crate::errors::GatewayError;

/// HTTP client for the Marathon API.
///
/// Built once at startup and shared by every request; it holds no mutable
/// state.
#[derive(Debug, Clone)]
pub struct MarathonClient {
    client: Client,
    base_url: String,
    auth: Option<BasicAuthSettings>,
}

impl MarathonClient {
    /// Create a new Marathon client
    pub fn new(base_url: &str, auth: Option<BasicAuthSettings>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::ConfigError(format!("cannot build Marathon client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let request = self.authorize(self.client.get(&url).query(query));
        self.send(request, "GET", context).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        context: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} {:?}", url, query);

        let request = self.authorize(self.client.post(&url).query(query).json(body));
        self.send(request, "POST", context).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        context: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("PUT {} {:?}", url, query);

        let request = self.authorize(self.client.put(&url).query(query).json(body));
        self.send(request, "PUT", context).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("DELETE {}", url);

        let request = self.authorize(self.client.delete(&url));
        self.send(request, "DELETE", context).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(auth) => request.basic_auth(&auth.user, Some(&auth.password)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        verb: &str,
        context: &str,
    ) -> Result<T, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(context, e))?;

        if !response.status().is_success() {
            let err = status_error(response, context).await;
            error!("HTTP {} failed: {}", verb, err);
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::from_transport(context, e))
    }
}

async fn status_error(response: Response, context: &str) -> GatewayError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(text);
    GatewayError::from_backend_status(status, context, &detail)
}
