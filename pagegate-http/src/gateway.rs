use async_trait::async_trait;
use reqwest::{Client, Url, header::HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use pagegate_core::{
    context::{RequestContext, TOKEN_HEADER},
    error::{FacadeError, FacadeResult},
    gateway::{Endpoint, Gateway, GatewayBuilder, decode_response},
    model::{Collection, Page},
    query::{CollectionQuery, PageQuery},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway from an existing client. `base_url` must not end with the endpoint.
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn builder(base_url: &str) -> HttpGatewayBuilder {
        HttpGatewayBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    async fn post<Q, T>(&self, endpoint: Endpoint, body: &Q, ctx: &RequestContext) -> FacadeResult<T>
    where
        Q: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.endpoint_url(endpoint)).json(body);

        if let Some(credential) = ctx.credential() {
            let mut value = HeaderValue::from_bytes(credential.as_bytes()).map_err(|_| {
                FacadeError::Validation("credential is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            request = request.header(TOKEN_HEADER, value);
        }

        tracing::debug!(%endpoint, authenticated = ctx.credential().is_some(), "calling document service");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        if !response_ok(status) {
            tracing::warn!(%endpoint, status, "document service returned an error status");
        }

        decode_response(endpoint, status, &bytes)
    }
}

fn response_ok(status: u16) -> bool {
    (200..=299).contains(&status)
}

fn transport_error(endpoint: Endpoint, err: reqwest::Error) -> FacadeError {
    if err.is_timeout() {
        FacadeError::Timeout(format!("{endpoint}: {err}"))
    } else {
        FacadeError::Transport(format!("{endpoint}: {err}"))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page> {
        self.post(Endpoint::FetchPage, query, ctx).await
    }

    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection> {
        self.post(Endpoint::FetchCollection, query, ctx).await
    }
}

pub struct HttpGatewayBuilder {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl HttpGatewayBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: concat!("pagegate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Deadline for a whole call, from connecting to reading the last byte of the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

#[async_trait]
impl GatewayBuilder for HttpGatewayBuilder {
    type Gateway = HttpGateway;

    async fn build(self) -> FacadeResult<Self::Gateway> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| FacadeError::Initialization(format!("invalid base url `{}`: {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FacadeError::Initialization(format!(
                "unsupported base url scheme `{}`",
                url.scheme()
            )));
        }

        Ok(HttpGateway::new(
            Client::builder()
                .timeout(self.timeout)
                .connect_timeout(self.connect_timeout)
                .user_agent(self.user_agent)
                .build()
                .map_err(|e| FacadeError::Initialization(e.to_string()))?,
            &self.base_url,
        ))
    }
}
