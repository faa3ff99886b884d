//! HTTP client for the gateway API

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::models::{
    Artifact, DeploymentSpec, ErrorResponse, ListDeploymentsResponse, NameResponse,
};

/// Errors returned by [`GatewayClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid gateway URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Client bound to a single gateway instance
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl GatewayClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            access_token: None,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List deployment names; `all` disables the ownership filter
    pub async fn list(&self, all: bool) -> Result<Vec<String>, ClientError> {
        let mut url = self.deployment_url(&[])?;
        if all {
            url.query_pairs_mut().append_pair("all", "true");
        }
        let body: ListDeploymentsResponse = self.send(Method::GET, url, None::<&()>).await?;
        Ok(body.deployments)
    }

    /// Fetch one deployment
    pub async fn info(&self, name: &str) -> Result<Artifact, ClientError> {
        let url = self.deployment_url(&[name])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Create a deployment, returning the identifier assigned by the backend
    pub async fn create(&self, spec: &DeploymentSpec) -> Result<String, ClientError> {
        let url = self.deployment_url(&[])?;
        let body: NameResponse = self.send(Method::POST, url, Some(spec)).await?;
        Ok(body.name)
    }

    /// Replace an existing deployment
    pub async fn update(&self, spec: &DeploymentSpec) -> Result<(), ClientError> {
        let url = self.deployment_url(&[&spec.name])?;
        let _: serde_json::Value = self.send(Method::PUT, url, Some(spec)).await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), ClientError> {
        let url = self.deployment_url(&[name])?;
        let _: serde_json::Value = self.send(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    /// Change the replica count of a deployment
    pub async fn scale(&self, name: &str, replicas: u32, force: bool) -> Result<(), ClientError> {
        let count = replicas.to_string();
        let mut url = self.deployment_url(&[name, "replicas", &count])?;
        if force {
            url.query_pairs_mut().append_pair("force", "true");
        }
        let _: serde_json::Value = self.send(Method::PATCH, url, None::<&()>).await?;
        Ok(())
    }

    fn deployment_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty().push("deployments");
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.access_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        request
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        debug!("{} {}", method, url);
        let mut request = self.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("HTTP {} failed: {}", method, err);
            return Err(err);
        }

        Ok(response.json().await?)
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    ClientError::Api { status, message }
}
