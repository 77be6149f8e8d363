use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use trellis_core::{AuthorizationResult, WidgetIdentity};

use crate::error::AuthError;

/// Facade trait for the authorization endpoint.
///
/// Implementations issue one attempt; retry budgeting lives in
/// [`crate::Authorizer`]. Uses Pin<Box<dyn Future>> for dyn-compatibility.
pub trait AuthTransport: Send + Sync {
    fn fetch<'a>(
        &'a self,
        identity: &'a WidgetIdentity,
    ) -> Pin<Box<dyn Future<Output = Result<AuthorizationResult, AuthError>> + Send + 'a>>;
}

/// HTTP transport: `GET {base_url}/api/auth/widget?website_id=…&app_id=…`.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthTransport for HttpTransport {
    fn fetch<'a>(
        &'a self,
        identity: &'a WidgetIdentity,
    ) -> Pin<Box<dyn Future<Output = Result<AuthorizationResult, AuthError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/api/auth/widget", identity.base_url);

            let resp = self
                .http
                .get(&url)
                .query(&[
                    ("website_id", identity.website_id.as_str()),
                    ("app_id", identity.app_id.as_str()),
                ])
                .send()
                .await
                .map_err(|e| AuthError::Transport(format!("HTTP request failed: {e}")))?;

            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                return Err(AuthError::Status { status, body });
            }

            resp.json::<AuthorizationResult>()
                .await
                .map_err(|e| AuthError::Transport(format!("Failed to parse response: {e}")))
        })
    }
}

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Ok(AuthorizationResult),
    Err(String),
}

/// Scripted transport for tests: plays back a fixed sequence of outcomes.
///
/// Once the script runs out, the last outcome repeats. The call counter
/// makes "zero network requests" assertions possible.
pub struct ScriptedTransport {
    outcomes: Vec<ScriptedOutcome>,
    call_count: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<ScriptedOutcome>) -> Self {
        Self {
            outcomes,
            call_count: AtomicUsize::new(0),
        }
    }

    /// A transport that always succeeds with the given result.
    pub fn always_ok(result: AuthorizationResult) -> Self {
        Self::new(vec![ScriptedOutcome::Ok(result)])
    }

    /// A transport that always fails with the given message.
    pub fn always_err(message: &str) -> Self {
        Self::new(vec![ScriptedOutcome::Err(message.to_string())])
    }

    /// Number of fetch calls made so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl AuthTransport for ScriptedTransport {
    fn fetch<'a>(
        &'a self,
        _identity: &'a WidgetIdentity,
    ) -> Pin<Box<dyn Future<Output = Result<AuthorizationResult, AuthError>> + Send + 'a>> {
        Box::pin(async move {
            let idx = self.call_count.fetch_add(1, Ordering::Relaxed);
            let outcome = self
                .outcomes
                .get(idx.min(self.outcomes.len().saturating_sub(1)))
                .cloned()
                .unwrap_or(ScriptedOutcome::Err("no scripted outcome".to_string()));

            match outcome {
                ScriptedOutcome::Ok(result) => Ok(result),
                ScriptedOutcome::Err(message) => Err(AuthError::Transport(message)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> WidgetIdentity {
        WidgetIdentity::new("site-1", "app-1", "https://platform.example", "chat_widget", "1.0.0")
            .unwrap()
    }

    #[tokio::test]
    async fn scripted_transport_plays_sequence_then_repeats_last() {
        let ok = AuthorizationResult {
            authorized: true,
            ..Default::default()
        };
        let transport = ScriptedTransport::new(vec![
            ScriptedOutcome::Err("boom".into()),
            ScriptedOutcome::Ok(ok.clone()),
        ]);
        let identity = identity();

        assert!(transport.fetch(&identity).await.is_err());
        assert!(transport.fetch(&identity).await.is_ok());
        // Script exhausted: last outcome repeats.
        assert!(transport.fetch(&identity).await.is_ok());
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn http_transport_fails_against_unroutable_host() {
        let transport = HttpTransport::new();
        let identity =
            WidgetIdentity::new("site-1", "app-1", "http://127.0.0.1:9", "chat_widget", "1.0.0")
                .unwrap();

        let err = transport.fetch(&identity).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}
