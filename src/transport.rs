use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use reqwest::Url;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("building request: {0}")]
    Build(reqwest::Error),
    #[error("sending request: {0}")]
    Send(reqwest::Error),
    #[error("reading response body: {0}")]
    Body(reqwest::Error),
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Issues a single GET and throws the response body away.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<(), RequestError>>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<(), RequestError>> {
        async move {
            let request = self
                .client
                .get(url.clone())
                .build()
                .map_err(RequestError::Build)?;
            let response = self
                .client
                .execute(request)
                .await
                .map_err(RequestError::Send)?;
            tracing::trace!(status = %response.status(), "response");

            // the connection goes back to the pool when the stream drops,
            // whether or not the body was read to the end
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                chunk.map_err(RequestError::Body)?;
            }
            Ok(())
        }
        .boxed()
    }
}
