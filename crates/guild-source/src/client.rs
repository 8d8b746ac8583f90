//! HTTP roster source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument};

use guild_core::value_objects::GuildId;

use crate::error::{SourceError, SourceResult};
use crate::payloads::{decode_response, GuildRequest, TicketRules};
use crate::snapshot::GuildSnapshot;
use crate::RosterSource;

/// Roster source reached by one JSON POST per guild
#[derive(Debug, Clone)]
pub struct HttpRosterSource {
    client: Client,
    url: String,
    rules: TicketRules,
}

impl HttpRosterSource {
    /// Build a source posting to `url`; every request is bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration, rules: TicketRules) -> SourceResult<Self> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Setup(e.to_string()))?;

        debug!(url = %url, timeout_secs = timeout.as_secs(), "Created roster source");
        Ok(Self { client, url, rules })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn fetch_guild(&self, guild_id: &GuildId) -> SourceResult<GuildSnapshot> {
        let response = self
            .client
            .post(&self.url)
            .json(&GuildRequest::new(guild_id))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Roster request failed");
                SourceError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Roster source returned an error status");
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            error!(error = ?e, "Failed to read roster body");
            SourceError::Transport(e.to_string())
        })?;

        let guild = decode_response(&body).inspect_err(|e| {
            error!(error = %e, bytes = body.len(), "Failed to decode roster");
        })?;

        let snapshot = GuildSnapshot::from_payload(guild_id.clone(), guild, self.rules)?;
        debug!(
            members = snapshot.members.len(),
            raids = snapshot.raids.len(),
            "Fetched roster"
        );
        Ok(snapshot)
    }
}
