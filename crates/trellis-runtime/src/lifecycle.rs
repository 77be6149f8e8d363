use std::sync::Arc;

use trellis_auth::{AuthTransport, Authorizer, CacheStore, DiskStore, HttpTransport};
use trellis_core::{AuthorizationResult, RuntimeOptions, WidgetIdentity};

use crate::error::WidgetError;
use crate::hooks::WidgetHooks;
use crate::readiness::ReadySignal;
use crate::telemetry::{AnalyticsEvent, EventSink, HttpSink, NullSink};

/// Current phase of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Created => write!(f, "created"),
            LifecycleState::Starting => write!(f, "starting"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Stopping => write!(f, "stopping"),
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Failed => write!(f, "failed"),
        }
    }
}

/// The widget lifecycle runtime.
///
/// `WidgetRuntime` owns the state machine driving a single widget instance
/// through `start` → `stop` / `reload`, delegating the actual widget work to
/// a host-supplied [`WidgetHooks`] implementation and authorization to
/// [`Authorizer`].
///
/// Lifecycle errors (authorization exhaustion, hook failures) are caught at
/// the entry points: they are logged, reported as `widget_error` telemetry,
/// retained via [`WidgetRuntime::last_error`], and never propagate into the
/// embedding layer's call stack.
///
/// # Concurrency
///
/// The entry points take `&mut self`, so at most one start/stop/reload
/// sequence is in flight per instance; sequential caller discipline is a
/// compile-time fact rather than a runtime lock. Instances sharing a cache
/// store race on it with last-write-wins semantics.
pub struct WidgetRuntime {
    identity: WidgetIdentity,
    options: RuntimeOptions,
    authorizer: Authorizer,
    hooks: Box<dyn WidgetHooks>,
    sink: Arc<dyn EventSink>,
    ready: ReadySignal,
    state: LifecycleState,
    current: Option<AuthorizationResult>,
    last_error: Option<WidgetError>,
}

impl WidgetRuntime {
    /// Start building a runtime for `identity` driving `hooks`.
    pub fn builder(identity: WidgetIdentity, hooks: impl WidgetHooks + 'static) -> WidgetRuntimeBuilder {
        WidgetRuntimeBuilder {
            identity,
            hooks: Box::new(hooks),
            options: RuntimeOptions::default(),
            transport: None,
            store: None,
            sink: None,
            preview: None,
            ready: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The config of the most recent authorized result, if the widget has
    /// ever reached `Running`.
    pub fn config(&self) -> Option<&serde_json::Value> {
        self.current.as_ref().map(|r| &r.config)
    }

    pub fn authorization(&self) -> Option<&AuthorizationResult> {
        self.current.as_ref()
    }

    /// The most recent caught lifecycle error, if any.
    pub fn last_error(&self) -> Option<&WidgetError> {
        self.last_error.as_ref()
    }

    /// Run the start sequence: wait for readiness, authorize, init, render.
    ///
    /// Valid from `Created` or `Stopped`; ignored (with a warning) from any
    /// other state. An unauthorized result halts the sequence without error
    /// and without invoking any hook, reverting to the entry state so a later
    /// `start()` remains legal. Failures mark the instance `Failed`.
    pub async fn start(&mut self) {
        if !matches!(self.state, LifecycleState::Created | LifecycleState::Stopped) {
            tracing::warn!(state = %self.state, "start() ignored in current state");
            return;
        }
        let entered_from = self.state;
        self.state = LifecycleState::Starting;
        tracing::info!(
            widget = %self.identity.widget_name,
            website_id = %self.identity.website_id,
            "Starting widget"
        );

        self.ready.wait().await;

        match self.try_start().await {
            Ok(true) => {
                self.state = LifecycleState::Running;
                tracing::info!(widget = %self.identity.widget_name, "Widget running");
                self.emit("widget_loaded", serde_json::json!({}));
            }
            Ok(false) => {
                tracing::info!(
                    widget = %self.identity.widget_name,
                    "Widget not authorized, staying idle"
                );
                self.state = entered_from;
            }
            Err(e) => self.fail("start", e),
        }
    }

    /// Run the stop sequence: destroy, then rest at `Stopped`.
    ///
    /// Idempotent: a second call is a no-op and `on_destroy` runs at most
    /// once. A hook failure is reported but never blocks the transition —
    /// stop always reaches the terminal state, with the failure retained in
    /// [`WidgetRuntime::last_error`] instead of being silently dropped.
    pub async fn stop(&mut self) {
        if self.state == LifecycleState::Stopped {
            tracing::debug!("stop() ignored, already stopped");
            return;
        }
        self.state = LifecycleState::Stopping;
        tracing::info!(widget = %self.identity.widget_name, "Stopping widget");

        match self.hooks.on_destroy().await {
            Ok(()) => {
                tracing::info!(widget = %self.identity.widget_name, "Widget stopped");
            }
            Err(e) => {
                let error = WidgetError::Hook {
                    hook: "on_destroy",
                    source: e,
                };
                tracing::error!(error = %error, "on_destroy failed, widget stopped anyway");
                self.emit(
                    "widget_error",
                    serde_json::json!({ "action": "stop", "error": error.to_string() }),
                );
                self.last_error = Some(error);
            }
        }
        self.state = LifecycleState::Stopped;
    }

    /// Re-authorize (bypassing the cache) and apply the fresh config.
    ///
    /// Valid only from `Running`. If the hooks implementation supplies
    /// `on_config_update` it is preferred; otherwise the widget is destroyed
    /// and re-rendered with the new config. A fresh unauthorized result
    /// leaves the running widget untouched. Failures mark the instance
    /// `Failed`.
    pub async fn reload(&mut self) {
        if self.state != LifecycleState::Running {
            tracing::warn!(state = %self.state, "reload() ignored in current state");
            return;
        }

        match self.try_reload().await {
            Ok(true) => {
                tracing::info!(widget = %self.identity.widget_name, "Widget reloaded");
            }
            Ok(false) => {
                tracing::info!(
                    widget = %self.identity.widget_name,
                    "Reload denied authorization, keeping current widget"
                );
            }
            Err(e) => self.fail("reload", e),
        }
    }

    async fn try_start(&mut self) -> Result<bool, WidgetError> {
        let result = self.authorizer.authorize(&self.identity).await?;
        if !result.authorized {
            return Ok(false);
        }

        let config = result.config.clone();
        self.hooks.on_init(&config).await.map_err(|e| WidgetError::Hook {
            hook: "on_init",
            source: e,
        })?;
        self.hooks.on_render(&config).await.map_err(|e| WidgetError::Hook {
            hook: "on_render",
            source: e,
        })?;

        self.current = Some(result);
        Ok(true)
    }

    async fn try_reload(&mut self) -> Result<bool, WidgetError> {
        let result = self.authorizer.refresh(&self.identity).await?;
        if !result.authorized {
            return Ok(false);
        }

        let config = result.config.clone();
        if let Some(update) = self.hooks.on_config_update(&config) {
            update.await.map_err(|e| WidgetError::Hook {
                hook: "on_config_update",
                source: e,
            })?;
        } else {
            self.hooks.on_destroy().await.map_err(|e| WidgetError::Hook {
                hook: "on_destroy",
                source: e,
            })?;
            self.hooks.on_render(&config).await.map_err(|e| WidgetError::Hook {
                hook: "on_render",
                source: e,
            })?;
        }

        self.current = Some(result);
        Ok(true)
    }

    fn fail(&mut self, action: &'static str, error: WidgetError) {
        tracing::error!(action, error = %error, "Widget lifecycle failure");
        self.emit(
            "widget_error",
            serde_json::json!({ "action": action, "error": error.to_string() }),
        );
        self.state = LifecycleState::Failed;
        self.last_error = Some(error);
    }

    fn emit(&self, event_type: &str, extra: serde_json::Value) {
        if !self.options.analytics_enabled {
            return;
        }
        self.sink
            .emit(AnalyticsEvent::new(&self.identity, event_type, extra));
    }
}

/// Builder wiring a [`WidgetRuntime`] to its collaborators.
///
/// Defaults: HTTP transport against the identity's base URL, disk-backed
/// cache store, HTTP analytics sink (null sink when analytics is disabled),
/// and an already-ready signal.
pub struct WidgetRuntimeBuilder {
    identity: WidgetIdentity,
    hooks: Box<dyn WidgetHooks>,
    options: RuntimeOptions,
    transport: Option<Arc<dyn AuthTransport>>,
    store: Option<Arc<dyn CacheStore>>,
    sink: Option<Arc<dyn EventSink>>,
    preview: Option<serde_json::Value>,
    ready: Option<ReadySignal>,
}

impl WidgetRuntimeBuilder {
    pub fn options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn AuthTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Inject a preview config override (checked before cache and network).
    pub fn preview(mut self, preview: Option<serde_json::Value>) -> Self {
        self.preview = preview;
        self
    }

    pub fn ready(mut self, ready: ReadySignal) -> Self {
        self.ready = Some(ready);
        self
    }

    pub fn build(self) -> WidgetRuntime {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(DiskStore::new(DiskStore::default_path())));
        let sink: Arc<dyn EventSink> = match self.sink {
            Some(sink) => sink,
            None if self.options.analytics_enabled => {
                Arc::new(HttpSink::new(&self.identity.base_url))
            }
            None => Arc::new(NullSink),
        };

        let authorizer =
            Authorizer::new(&self.options, transport, store).with_preview(self.preview);

        WidgetRuntime {
            identity: self.identity,
            options: self.options,
            authorizer,
            hooks: self.hooks,
            sink,
            ready: self.ready.unwrap_or_default(),
            state: LifecycleState::Created,
            current: None,
            last_error: None,
        }
    }
}
