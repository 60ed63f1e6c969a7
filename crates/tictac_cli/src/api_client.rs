//! HTTP client for the game store API.

use derive_more::{Display, Error, From};
use serde::{Deserialize, de::DeserializeOwned};
use tictac_engine::{BoardSnapshot, RoundWinner};
use tictac_server::Game;
use tictac_server::api::{AppendRoundRequest, CreateGameRequest};
use tracing::{debug, instrument, warn};

/// Failure talking to the game store.
#[derive(Debug, Display, Error, From)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[display("Server returned {}: {}", status, message)]
    #[from(skip)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the `error` field of the response body.
        message: String,
    },
    /// The request could not be sent or the response not decoded.
    #[display("Request failed: {}", _0)]
    Http(reqwest::Error),
}

impl ClientError {
    /// HTTP status of a server-side rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    ok: bool,
}

/// Typed client for every `/api` endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Checks that the server is up.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<bool, ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let body: HealthBody = decode(response).await?;
        Ok(body.ok)
    }

    /// Lists all games, newest first.
    #[instrument(skip(self))]
    pub async fn list_games(&self) -> Result<Vec<Game>, ClientError> {
        let response = self.client.get(self.url("/games")).send().await?;
        let games: Vec<Game> = decode(response).await?;
        debug!(count = games.len(), "Listed games");
        Ok(games)
    }

    /// Creates a game for two players.
    #[instrument(skip(self))]
    pub async fn create_game(&self, player1: &str, player2: &str) -> Result<Game, ClientError> {
        let body = CreateGameRequest::new(Some(player1.to_string()), Some(player2.to_string()));
        let response = self
            .client
            .post(self.url("/games"))
            .json(&body)
            .send()
            .await?;
        let game: Game = decode(response).await?;
        debug!(game_id = %game.id, "Created game");
        Ok(game)
    }

    /// Fetches one game.
    #[instrument(skip(self))]
    pub async fn get_game(&self, id: &str) -> Result<Game, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/games/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    /// Records a finished round.
    #[instrument(skip(self, board))]
    pub async fn append_round(
        &self,
        id: &str,
        winner: RoundWinner,
        board: BoardSnapshot,
    ) -> Result<Game, ClientError> {
        let body = AppendRoundRequest::new(Some(winner.to_string()), Some(board));
        let response = self
            .client
            .post(self.url(&format!("/games/{}/rounds", id)))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// Stops a game. Stopping twice is harmless.
    #[instrument(skip(self))]
    pub async fn stop_game(&self, id: &str) -> Result<Game, ClientError> {
        let response = self
            .client
            .post(self.url(&format!("/games/{}/stop", id)))
            .send()
            .await?;
        decode(response).await
    }
}

/// Decodes a success body, or turns the server's `{ "error" }` body into a
/// [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };
    warn!(status = status.as_u16(), message = %message, "Request rejected");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
