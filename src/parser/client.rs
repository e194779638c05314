use chrono::{DateTime, Local};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::action::ParsedAction;
use crate::calendar::CalendarEvent;
use crate::config::CommandType;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Failed to connect to the server.")]
    Connect(#[source] reqwest::Error),

    /// Message sent by the service with a non-2xx status, shown as-is.
    #[error("{0}")]
    Server(String),

    #[error("No events to process.")]
    NoActions,

    /// The body was not JSON. Reported the same way as a dropped connection.
    #[error("Failed to connect to the server.")]
    Decode(#[source] serde_json::Error),
}

/// Body of a `POST /parse_event` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub input: String,
    pub command_type: CommandType,
    pub events: Vec<EventContext>,
}

/// An event reduced to what the service needs for context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<Local>,
    pub end_date: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&CalendarEvent> for EventContext {
    fn from(ev: &CalendarEvent) -> Self {
        Self {
            id: ev.id.clone(),
            title: ev.title.clone(),
            start_date: ev.start,
            end_date: ev.end,
            location: ev.location.clone(),
            notes: ev.notes.clone(),
        }
    }
}

impl ParseRequest {
    pub fn new<'a>(
        input: &str,
        command_type: CommandType,
        events: impl IntoIterator<Item = &'a CalendarEvent>,
    ) -> Self {
        Self {
            input: input.to_string(),
            command_type,
            events: events.into_iter().map(EventContext::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParserClient {
    http: Client,
    url: String,
}

impl ParserClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: Client::new(),
            url: format!("{}/parse_event", endpoint.trim_end_matches('/')),
        }
    }

    #[cfg(test)]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and decode the actions. No retries.
    pub async fn parse(&self, request: &ParseRequest) -> Result<Vec<ParsedAction>, ParserError> {
        info!(
            url = %self.url,
            command_type = ?request.command_type,
            events = request.events.len(),
            "sending parse request"
        );

        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "parse request failed");
                ParserError::Connect(err)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            error!(error = %err, "failed to read parse response");
            ParserError::Connect(err)
        })?;
        debug!(%status, bytes = body.len(), "parse response received");

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|err| {
            error!(%status, error = %err, "parse response is not JSON");
            ParserError::Decode(err)
        })?;

        if !status.is_success() {
            let message = serde_json::from_value::<ErrorBody>(value)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            error!(%status, %message, "parser service returned an error");
            return Err(ParserError::Server(message));
        }

        decode_actions(value)
    }
}

/// Items are decoded one by one so a single odd entry cannot sink the rest.
fn decode_actions(value: serde_json::Value) -> Result<Vec<ParsedAction>, ParserError> {
    let serde_json::Value::Array(items) = value else {
        return Err(ParserError::NoActions);
    };

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|err| {
                warn!(error = %err, "undecodable action, skipping");
                ParsedAction::Unknown
            })
        })
        .collect())
}
