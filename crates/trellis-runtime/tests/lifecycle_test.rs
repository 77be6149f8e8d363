//! Lifecycle scenarios for the widget runtime: start/stop/reload driven
//! against a scripted transport, an in-memory cache store, and recording
//! hooks/sink implementations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use trellis_auth::{AuthTransport, MemoryStore, ScriptedOutcome, ScriptedTransport};
use trellis_core::{AuthorizationResult, RuntimeOptions, WidgetIdentity};
use trellis_runtime::{
    AnalyticsEvent, EventSink, HookFuture, LifecycleState, ReadySignal, WidgetError, WidgetHooks,
    WidgetRuntime,
};

#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, call: &str) {
        self.0.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

struct RecordingHooks {
    log: CallLog,
    fail_init: bool,
    fail_destroy: bool,
    handles_config_update: bool,
}

impl RecordingHooks {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_init: false,
            fail_destroy: false,
            handles_config_update: false,
        }
    }
}

impl WidgetHooks for RecordingHooks {
    fn on_init<'a>(&'a self, _config: &'a serde_json::Value) -> HookFuture<'a> {
        Box::pin(async move {
            self.log.push("init");
            if self.fail_init {
                anyhow::bail!("init exploded");
            }
            Ok(())
        })
    }

    fn on_render<'a>(&'a self, _config: &'a serde_json::Value) -> HookFuture<'a> {
        Box::pin(async move {
            self.log.push("render");
            Ok(())
        })
    }

    fn on_destroy<'a>(&'a self) -> HookFuture<'a> {
        Box::pin(async move {
            self.log.push("destroy");
            if self.fail_destroy {
                anyhow::bail!("destroy exploded");
            }
            Ok(())
        })
    }

    fn on_config_update<'a>(&'a self, _config: &'a serde_json::Value) -> Option<HookFuture<'a>> {
        if !self.handles_config_update {
            return None;
        }
        Some(Box::pin(async move {
            self.log.push("config_update");
            Ok(())
        }))
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<AnalyticsEvent>>);

impl RecordingSink {
    fn event_types(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|e| e.event_type.clone()).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: AnalyticsEvent) {
        self.0.lock().unwrap().push(event);
    }
}

fn identity() -> WidgetIdentity {
    WidgetIdentity::new("site-1", "app-1", "https://platform.example", "chat_widget", "1.0.0")
        .unwrap()
}

fn authorized(token: &str, config: serde_json::Value) -> AuthorizationResult {
    AuthorizationResult {
        authorized: true,
        config,
        token: token.into(),
        ..Default::default()
    }
}

fn unauthorized() -> AuthorizationResult {
    AuthorizationResult::default()
}

fn fast_options() -> RuntimeOptions {
    RuntimeOptions {
        retry_attempts: 2,
        retry_delay_ms: 10,
        ..Default::default()
    }
}

struct Harness {
    runtime: WidgetRuntime,
    log: CallLog,
    sink: Arc<RecordingSink>,
    transport: Arc<ScriptedTransport>,
}

fn harness_with(
    outcomes: Vec<ScriptedOutcome>,
    configure: impl FnOnce(&mut RecordingHooks),
) -> Harness {
    let log = CallLog::default();
    let mut hooks = RecordingHooks::new(log.clone());
    configure(&mut hooks);

    let sink = Arc::new(RecordingSink::default());
    let transport = Arc::new(ScriptedTransport::new(outcomes));

    let runtime = WidgetRuntime::builder(identity(), hooks)
        .options(fast_options())
        .transport(transport.clone() as Arc<dyn AuthTransport>)
        .store(Arc::new(MemoryStore::new()))
        .sink(sink.clone())
        .build();

    Harness {
        runtime,
        log,
        sink,
        transport,
    }
}

fn harness(outcomes: Vec<ScriptedOutcome>) -> Harness {
    harness_with(outcomes, |_| {})
}

#[tokio::test]
async fn start_runs_init_then_render_and_emits_widget_loaded() {
    let mut h = harness(vec![ScriptedOutcome::Ok(authorized(
        "tok_1",
        serde_json::json!({ "theme": "dark" }),
    ))]);

    h.runtime.start().await;

    assert_eq!(h.runtime.state(), LifecycleState::Running);
    assert_eq!(h.log.calls(), vec!["init", "render"]);
    assert_eq!(h.runtime.config().unwrap()["theme"], "dark");
    assert_eq!(h.sink.event_types(), vec!["widget_loaded"]);
}

#[tokio::test]
async fn unauthorized_start_invokes_no_hooks_and_stays_idle() {
    let mut h = harness(vec![ScriptedOutcome::Ok(unauthorized())]);

    h.runtime.start().await;

    assert_eq!(h.runtime.state(), LifecycleState::Created);
    assert!(h.log.calls().is_empty());
    assert!(h.sink.event_types().is_empty());
    assert!(h.runtime.last_error().is_none());
}

#[tokio::test]
async fn failing_init_marks_widget_failed_without_rendering() {
    let mut h = harness_with(
        vec![ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({})))],
        |hooks| hooks.fail_init = true,
    );

    h.runtime.start().await;

    assert_eq!(h.runtime.state(), LifecycleState::Failed);
    assert_eq!(h.log.calls(), vec!["init"]);
    assert!(matches!(
        h.runtime.last_error(),
        Some(WidgetError::Hook { hook: "on_init", .. })
    ));
    assert_eq!(h.sink.event_types(), vec!["widget_error"]);
}

#[tokio::test(start_paused = true)]
async fn authorization_exhaustion_is_caught_not_thrown() {
    let mut h = harness(vec![ScriptedOutcome::Err("service down".into())]);

    h.runtime.start().await;

    assert_eq!(h.runtime.state(), LifecycleState::Failed);
    assert_eq!(h.transport.calls(), 2); // retry_attempts in fast_options
    assert!(matches!(
        h.runtime.last_error(),
        Some(WidgetError::Authorization(_))
    ));
    assert_eq!(h.sink.event_types(), vec!["widget_error"]);
}

#[tokio::test]
async fn stop_twice_destroys_exactly_once() {
    let mut h = harness(vec![ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({})))]);

    h.runtime.start().await;
    h.runtime.stop().await;
    h.runtime.stop().await;

    assert_eq!(h.runtime.state(), LifecycleState::Stopped);
    assert_eq!(h.log.count("destroy"), 1);
}

#[tokio::test]
async fn failing_destroy_still_reaches_stopped_but_is_reported() {
    let mut h = harness_with(
        vec![ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({})))],
        |hooks| hooks.fail_destroy = true,
    );

    h.runtime.start().await;
    h.runtime.stop().await;

    assert_eq!(h.runtime.state(), LifecycleState::Stopped);
    assert!(matches!(
        h.runtime.last_error(),
        Some(WidgetError::Hook { hook: "on_destroy", .. })
    ));
    assert_eq!(h.sink.event_types(), vec!["widget_loaded", "widget_error"]);
}

#[tokio::test]
async fn widget_restarts_after_stop() {
    let mut h = harness(vec![ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({})))]);

    h.runtime.start().await;
    h.runtime.stop().await;
    h.runtime.start().await;

    assert_eq!(h.runtime.state(), LifecycleState::Running);
    assert_eq!(h.log.calls(), vec!["init", "render", "destroy", "init", "render"]);
    // Second start is served from cache.
    assert_eq!(h.transport.calls(), 1);
}

#[tokio::test]
async fn reload_prefers_config_update_hook() {
    let mut h = harness_with(
        vec![
            ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({ "v": 1 }))),
            ScriptedOutcome::Ok(authorized("tok_2", serde_json::json!({ "v": 2 }))),
        ],
        |hooks| hooks.handles_config_update = true,
    );

    h.runtime.start().await;
    h.runtime.reload().await;

    assert_eq!(h.runtime.state(), LifecycleState::Running);
    assert_eq!(h.log.calls(), vec!["init", "render", "config_update"]);
    assert_eq!(h.runtime.config().unwrap()["v"], 2);
    assert_eq!(h.runtime.authorization().unwrap().token, "tok_2");
}

#[tokio::test]
async fn reload_without_update_hook_destroys_and_rerenders() {
    let mut h = harness(vec![
        ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({ "v": 1 }))),
        ScriptedOutcome::Ok(authorized("tok_2", serde_json::json!({ "v": 2 }))),
    ]);

    h.runtime.start().await;
    h.runtime.reload().await;

    assert_eq!(h.runtime.state(), LifecycleState::Running);
    assert_eq!(h.log.calls(), vec!["init", "render", "destroy", "render"]);
    assert_eq!(h.runtime.config().unwrap()["v"], 2);
}

#[tokio::test]
async fn reload_denied_authorization_leaves_widget_untouched() {
    let mut h = harness(vec![
        ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({ "v": 1 }))),
        ScriptedOutcome::Ok(unauthorized()),
    ]);

    h.runtime.start().await;
    h.runtime.reload().await;

    assert_eq!(h.runtime.state(), LifecycleState::Running);
    assert_eq!(h.log.calls(), vec!["init", "render"]);
    assert_eq!(h.runtime.config().unwrap()["v"], 1);
    assert!(h.runtime.last_error().is_none());
}

#[tokio::test]
async fn reload_is_ignored_unless_running() {
    let mut h = harness(vec![ScriptedOutcome::Ok(authorized("tok_1", serde_json::json!({})))]);

    h.runtime.reload().await;

    assert_eq!(h.runtime.state(), LifecycleState::Created);
    assert!(h.log.calls().is_empty());
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn start_waits_for_ready_signal() {
    let log = CallLog::default();
    let hooks = RecordingHooks::new(log.clone());
    let (signal, notifier) = ReadySignal::pending();

    let mut runtime = WidgetRuntime::builder(identity(), hooks)
        .options(fast_options())
        .transport(Arc::new(ScriptedTransport::always_ok(authorized(
            "tok_1",
            serde_json::json!({}),
        ))))
        .store(Arc::new(MemoryStore::new()))
        .sink(Arc::new(RecordingSink::default()))
        .ready(signal)
        .build();

    let started = tokio::time::Instant::now();
    tokio::join!(runtime.start(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        notifier.notify();
    });

    assert_eq!(runtime.state(), LifecycleState::Running);
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn preview_override_starts_without_network() {
    let log = CallLog::default();
    let hooks = RecordingHooks::new(log.clone());
    let transport = Arc::new(ScriptedTransport::always_err("network down"));

    let mut runtime = WidgetRuntime::builder(identity(), hooks)
        .options(fast_options())
        .transport(transport.clone() as Arc<dyn AuthTransport>)
        .store(Arc::new(MemoryStore::new()))
        .sink(Arc::new(RecordingSink::default()))
        .preview(Some(serde_json::json!({ "greeting": "hello" })))
        .build();

    runtime.start().await;

    assert_eq!(runtime.state(), LifecycleState::Running);
    assert_eq!(runtime.config().unwrap()["greeting"], "hello");
    assert_eq!(transport.calls(), 0);
    assert_eq!(log.calls(), vec!["init", "render"]);
}

#[tokio::test]
async fn disabled_analytics_suppresses_events() {
    let log = CallLog::default();
    let hooks = RecordingHooks::new(log.clone());
    let sink = Arc::new(RecordingSink::default());

    let mut runtime = WidgetRuntime::builder(identity(), hooks)
        .options(RuntimeOptions {
            analytics_enabled: false,
            ..fast_options()
        })
        .transport(Arc::new(ScriptedTransport::always_ok(authorized(
            "tok_1",
            serde_json::json!({}),
        ))))
        .store(Arc::new(MemoryStore::new()))
        .sink(sink.clone())
        .build();

    runtime.start().await;

    assert_eq!(runtime.state(), LifecycleState::Running);
    assert!(sink.event_types().is_empty());
}
