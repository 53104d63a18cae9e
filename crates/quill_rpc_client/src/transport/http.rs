use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest_middleware::{ClientBuilder as HttpClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
#[cfg(feature = "tracing")]
use reqwest_tracing::TracingMiddleware;

use super::{SerializedRequest, Transport};
use crate::{RpcClientConfig, TransportError};

/// One HTTP POST per request. Requests are independent and may run in
/// parallel.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    url: url::Url,
    /// Retries transient failures
    client: ClientWithMiddleware,
    /// Sends exactly once
    client_without_retry: ClientWithMiddleware,
}

impl HttpTransport {
    /// Creates a transport for the node at `url`.
    pub fn new(url: &str, config: &RpcClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_error| TransportError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_error| TransportError::InvalidHeader(name.to_string()))?;
            headers.append(name, value);
        }
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let user_agent = config.user_agent();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&user_agent)
                .map_err(|_error| TransportError::InvalidHeader(user_agent))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(TransportError::ClientBuild)?;

        let retry = RetryTransientMiddleware::new_with_policy(config.retry.policy());

        #[cfg(feature = "tracing")]
        let (with_retry, without_retry) = (
            HttpClientBuilder::new(client.clone())
                .with(TracingMiddleware::default())
                .with(retry)
                .build(),
            HttpClientBuilder::new(client)
                .with(TracingMiddleware::default())
                .build(),
        );
        #[cfg(not(feature = "tracing"))]
        let (with_retry, without_retry) = (
            HttpClientBuilder::new(client.clone()).with(retry).build(),
            HttpClientBuilder::new(client).build(),
        );

        Ok(Self {
            url: url.parse()?,
            client: with_retry,
            client_without_retry: without_retry,
        })
    }

    /// The node's URL.
    pub fn url(&self) -> &url::Url {
        &self.url
    }
}

impl Transport for HttpTransport {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(id = request.id))
    )]
    async fn send(
        &self,
        request: SerializedRequest,
        idempotent: bool,
    ) -> Result<String, TransportError> {
        let client = if idempotent {
            &self.client
        } else {
            &self.client_without_retry
        };

        client
            .post(self.url.clone())
            .body(request.body)
            .send()
            .await?
            .error_for_status()
            .map_err(TransportError::HttpStatus)?
            .text()
            .await
            .map_err(TransportError::CorruptedResponse)
    }
}
