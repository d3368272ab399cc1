use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;

use crate::dao::{
    gateway::{DocumentKey, PersistenceGateway},
    models::{EnvelopeStatus, ResponseEnvelope},
    storage::StorageResult,
};

use super::{
    config::RemoteConfig,
    error::{RemoteError, RemoteResult},
};

/// HTTP client for the remote file-backed document store.
#[derive(Clone)]
pub struct RemoteGateway {
    client: Client,
    base_url: Arc<str>,
}

impl RemoteGateway {
    /// Build the client. No request is issued until the first call.
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| RemoteError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url)
    }

    fn send_error(path: &str, source: reqwest::Error) -> RemoteError {
        if source.is_timeout() {
            RemoteError::Timeout {
                path: path.to_string(),
                source,
            }
        } else {
            RemoteError::RequestSend {
                path: path.to_string(),
                source,
            }
        }
    }

    async fn read_envelope(
        path: &str,
        response: reqwest::Response,
    ) -> RemoteResult<ResponseEnvelope> {
        let body = response
            .bytes()
            .await
            .map_err(|source| Self::send_error(path, source))?;
        serde_json::from_slice::<ResponseEnvelope>(&body).map_err(|source| {
            RemoteError::DecodeResponse {
                path: path.to_string(),
                source,
            }
        })
    }

    async fn put_document(&self, key: &DocumentKey, payload: String) -> RemoteResult<()> {
        let path = key.to_string();
        let response = self
            .request(Method::PUT, &path)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| Self::send_error(&path, source))?;

        if !response.status().is_success() {
            return Err(RemoteError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        let envelope = Self::read_envelope(&path, response).await?;
        match envelope.status {
            EnvelopeStatus::Success => Ok(()),
            EnvelopeStatus::Error => Err(RemoteError::Refused {
                message: envelope.message.unwrap_or_else(|| "no message".into()),
                path,
            }),
        }
    }

    async fn get_document(&self, key: &DocumentKey) -> RemoteResult<Option<Value>> {
        let path = key.to_string();
        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .map_err(|source| Self::send_error(&path, source))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let envelope = Self::read_envelope(&path, response).await?;
                match envelope.status {
                    EnvelopeStatus::Success => Ok(envelope.data.filter(|data| !data.is_null())),
                    EnvelopeStatus::Error => Err(RemoteError::Refused {
                        message: envelope.message.unwrap_or_else(|| "no message".into()),
                        path,
                    }),
                }
            }
            other => Err(RemoteError::RequestStatus {
                path,
                status: other,
            }),
        }
    }
}

impl PersistenceGateway for RemoteGateway {
    fn upload(&self, key: DocumentKey, payload: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.put_document(&key, payload).await.map_err(Into::into) })
    }

    fn download(&self, key: DocumentKey) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let store = self.clone();
        Box::pin(async move { store.get_document(&key).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = format!("{}/", store.base_url);
            let response = store
                .client
                .get(&url)
                .send()
                .await
                .map_err(|source| Self::send_error(&url, source))?;

            if response.status().is_server_error() {
                Err(RemoteError::RequestStatus {
                    path: url,
                    status: response.status(),
                }
                .into())
            } else {
                Ok(())
            }
        })
    }
}
