use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use nostr_sdk::prelude::*;
use tracing::{debug, info, warn};

use crate::Error;

/// Where a single relay attempt stands. Attempts only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAttemptState {
    NotAttempted,
    Connecting,
    Connected,
    Publishing,
    Published,
    PublishFailed,
    ConnectFailed,
}

impl RelayAttemptState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Published | Self::PublishFailed | Self::ConnectFailed
        )
    }

    pub fn can_advance_to(self, next: Self) -> bool {
        use RelayAttemptState::*;
        matches!(
            (self, next),
            (NotAttempted, Connecting)
                | (Connecting, Connected)
                | (Connecting, ConnectFailed)
                | (Connected, Publishing)
                | (Publishing, Published)
                | (Publishing, PublishFailed)
        )
    }
}

/// Result of publishing to one relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub url: String,
    pub success: bool,
    pub error: Option<String>,
    pub state: RelayAttemptState,
}

impl PublishOutcome {
    /// Console line for this relay: `<label> <url>` on success, otherwise
    /// the raw error text.
    pub fn line(&self, label: &str) -> String {
        match &self.error {
            None => format!("{label} {}", self.url),
            Some(error) => error.clone(),
        }
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line("published to"))
    }
}

/// Per-relay outcomes of one publish, in the order the relays were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub event_id: String,
    pub outcomes: Vec<PublishOutcome>,
}

impl PublishReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

#[async_trait]
pub trait RelayConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn RelayConnection>, Error>;
}

#[async_trait]
pub trait RelayConnection: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<(), Error>;

    async fn close(&self) {}
}

/// Connects to relays through a short-lived `nostr-sdk` client per relay.
#[derive(Debug, Clone)]
pub struct NostrSdkConnector {
    connect_timeout: Duration,
    publish_timeout: Duration,
}

impl NostrSdkConnector {
    pub fn new(connect_timeout: Duration, publish_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            publish_timeout,
        }
    }
}

#[async_trait]
impl RelayConnector for NostrSdkConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn RelayConnection>, Error> {
        let client = Client::default();
        client.add_relay(url).await?;
        client.try_connect_relay(url, self.connect_timeout).await?;

        Ok(Box::new(SdkRelayConnection {
            client,
            url: url.to_string(),
            publish_timeout: self.publish_timeout,
        }))
    }
}

struct SdkRelayConnection {
    client: Client,
    url: String,
    publish_timeout: Duration,
}

#[async_trait]
impl RelayConnection for SdkRelayConnection {
    async fn publish(&self, event: &Event) -> Result<(), Error> {
        let output = tokio::time::timeout(self.publish_timeout, self.client.send_event(event))
            .await
            .map_err(|_| Error::Timeout)??;

        if output.success.is_empty() {
            let reason = output
                .failed
                .into_values()
                .next()
                .unwrap_or_else(|| "no acknowledgement".to_string());
            return Err(Error::Rejected {
                url: self.url.clone(),
                reason,
            });
        }
        Ok(())
    }

    async fn close(&self) {
        let _ = self.client.disconnect().await;
    }
}

struct RelayAttempt<'a> {
    url: &'a str,
    state: RelayAttemptState,
}

impl<'a> RelayAttempt<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            state: RelayAttemptState::NotAttempted,
        }
    }

    fn advance(&mut self, next: RelayAttemptState) {
        debug_assert!(self.state.can_advance_to(next), "{:?} -> {:?}", self.state, next);
        debug!(url = %self.url, from = ?self.state, to = ?next, "Relay attempt");
        self.state = next;
    }

    fn finish(self, error: Option<Error>) -> PublishOutcome {
        PublishOutcome {
            url: self.url.to_string(),
            success: error.is_none(),
            error: error.map(|e| e.to_string()),
            state: self.state,
        }
    }
}

/// Fans a signed event out to relays one at a time.
///
/// Every relay is attempted exactly once. A failure on one relay is logged
/// and recorded, never propagated.
pub struct RelayPublisher<C> {
    connector: C,
}

impl<C: RelayConnector> RelayPublisher<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub async fn publish(&self, event: &Event, urls: &[String]) -> PublishReport {
        let mut outcomes = Vec::with_capacity(urls.len());
        for url in urls {
            outcomes.push(self.attempt(event, url).await);
        }

        let report = PublishReport {
            event_id: event.id.to_string(),
            outcomes,
        };
        info!(
            event_id = %report.event_id,
            success = report.succeeded(),
            failed = report.failed(),
            "Published nostr event"
        );
        report
    }

    async fn attempt(&self, event: &Event, url: &str) -> PublishOutcome {
        let mut attempt = RelayAttempt::new(url);

        attempt.advance(RelayAttemptState::Connecting);
        let connection = match self.connector.connect(url).await {
            Ok(connection) => connection,
            Err(e) => {
                warn!(url = %url, error = %e, "Relay connect failed");
                attempt.advance(RelayAttemptState::ConnectFailed);
                return attempt.finish(Some(e));
            }
        };
        attempt.advance(RelayAttemptState::Connected);

        attempt.advance(RelayAttemptState::Publishing);
        let result = connection.publish(event).await;
        connection.close().await;

        match result {
            Ok(()) => {
                info!(url = %url, "Published to relay");
                attempt.advance(RelayAttemptState::Published);
                attempt.finish(None)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Relay publish failed");
                attempt.advance(RelayAttemptState::PublishFailed);
                attempt.finish(Some(e))
            }
        }
    }
}
