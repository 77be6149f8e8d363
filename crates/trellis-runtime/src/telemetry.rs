use serde::Serialize;
use trellis_core::WidgetIdentity;

/// Analytics wire event: the JSON body of `POST {base_url}/api/analytics`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub website_id: String,
    pub app_id: String,
    pub event_type: String,
    pub event_data: serde_json::Value,
}

impl AnalyticsEvent {
    /// Build an event; `event_data` carries the widget name and version plus
    /// any custom fields from `extra` (must be an object to contribute).
    pub fn new(identity: &WidgetIdentity, event_type: &str, extra: serde_json::Value) -> Self {
        let mut event_data = serde_json::json!({
            "widget": identity.widget_name,
            "version": identity.widget_version,
        });
        if let (Some(data), Some(fields)) = (event_data.as_object_mut(), extra.as_object()) {
            for (key, value) in fields {
                data.insert(key.clone(), value.clone());
            }
        }

        Self {
            website_id: identity.website_id.clone(),
            app_id: identity.app_id.clone(),
            event_type: event_type.to_string(),
            event_data,
        }
    }
}

/// Best-effort event sink. Emission never blocks or fails the lifecycle.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AnalyticsEvent);
}

/// Fire-and-forget HTTP sink. The POST runs on a spawned task; the response
/// is not awaited for correctness and failures are logged only.
pub struct HttpSink {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{base_url}/api/analytics"),
        }
    }
}

impl EventSink for HttpSink {
    fn emit(&self, event: AnalyticsEvent) {
        let request = self.http.post(&self.endpoint).json(&event);
        let event_type = event.event_type;

        tokio::spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::debug!(event_type, status = %resp.status(), "Analytics event rejected");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(event_type, error = %e, "Analytics event dropped");
                }
            }
        });
    }
}

/// Sink used when analytics is disabled.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: AnalyticsEvent) {}
}
