//! Control-plane API state store
//!
//! Talks to the connection state endpoints:
//! - `POST /api/v1/state/get` with `{"connectionId"}`
//! - `POST /api/v1/state/create_or_update` with `{"connectionId", "connectionState"}`

use super::StateStore;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::state::ConnectionState;
use crate::types::ConnectionId;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

const GET_STATE_PATH: &str = "/api/v1/state/get";
const CREATE_OR_UPDATE_STATE_PATH: &str = "/api/v1/state/create_or_update";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionIdRequestBody {
    connection_id: ConnectionId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStateCreateOrUpdate<'a> {
    connection_id: ConnectionId,
    connection_state: &'a ConnectionState,
}

/// State store backed by the control-plane HTTP API
#[derive(Debug)]
pub struct ApiStateStore {
    client: HttpClient,
}

impl ApiStateStore {
    /// Create a store from an HTTP client configuration
    ///
    /// The configuration must carry the API base URL.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::with_config(config)?,
        })
    }

    /// Create a store from an existing client
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StateStore for ApiStateStore {
    async fn get_state(&self, connection_id: ConnectionId) -> Result<Option<ConnectionState>> {
        let response = self
            .client
            .post_json(
                GET_STATE_PATH,
                &ConnectionIdRequestBody { connection_id },
                &[StatusCode::NOT_FOUND],
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        HttpClient::json(response).await.map(Some)
    }

    async fn create_or_update_state(
        &self,
        connection_id: ConnectionId,
        state: &ConnectionState,
    ) -> Result<()> {
        self.client
            .post_json(
                CREATE_OR_UPDATE_STATE_PATH,
                &ConnectionStateCreateOrUpdate {
                    connection_id,
                    connection_state: state,
                },
                &[],
            )
            .await?;
        Ok(())
    }
}
