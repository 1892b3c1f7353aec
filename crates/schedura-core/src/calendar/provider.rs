use crate::error::Result;
use crate::model::Event;
use crate::range::DateBounds;

/// An external calendar that events can be pulled from and pushed to.
///
/// Credentials are exchanged once through [`authenticate`]; the provider
/// keeps whatever token it obtains for later calls.
///
/// [`authenticate`]: CalendarSyncProvider::authenticate
pub trait CalendarSyncProvider {
    /// Unique identifier (e.g. "google", "caldav").
    fn name(&self) -> &str;

    fn is_authenticated(&self) -> bool;

    /// Exchange client credentials and an authorization code for a token.
    fn authenticate(&mut self, client_id: &str, client_secret: &str, auth_code: &str)
        -> Result<()>;

    /// Remote events within `bounds`, or all of them when unbounded.
    fn pull_events(&self, _bounds: Option<&DateBounds>) -> Result<Vec<Event>> {
        Ok(Vec::new())
    }

    /// Create or update `event` remotely and return its remote id.
    fn push_event(&self, _event: &Event) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Provider that accepts any credentials and never has remote events.
#[derive(Debug, Default)]
pub struct NoopSyncProvider {
    authenticated: bool,
}

impl NoopSyncProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CalendarSyncProvider for NoopSyncProvider {
    fn name(&self) -> &str {
        "noop"
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn authenticate(
        &mut self,
        client_id: &str,
        _client_secret: &str,
        _auth_code: &str,
    ) -> Result<()> {
        tracing::debug!(client_id, "noop provider authenticated");
        self.authenticated = true;
        Ok(())
    }
}
