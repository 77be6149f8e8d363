use std::future::Future;
use std::pin::Pin;

/// Future returned by a lifecycle hook.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Capability contract a widget implementation supplies to the runtime.
///
/// Three mandatory hooks drive the lifecycle: `on_init` establishes internal
/// state from the authorized config, `on_render` produces and attaches the
/// widget surface, `on_destroy` releases everything the other two acquired.
/// All of them may suspend; errors propagate into the runtime's failure path
/// and are never retried.
///
/// Uses Pin<Box<dyn Future>> for dyn-compatibility.
pub trait WidgetHooks: Send + Sync {
    fn on_init<'a>(&'a self, config: &'a serde_json::Value) -> HookFuture<'a>;

    fn on_render<'a>(&'a self, config: &'a serde_json::Value) -> HookFuture<'a>;

    fn on_destroy<'a>(&'a self) -> HookFuture<'a>;

    /// Optional in-place reconfiguration.
    ///
    /// When a reload produces a fresh authorized config, a `Some` return is
    /// awaited instead of the destroy + render pair. The default declines.
    fn on_config_update<'a>(&'a self, _config: &'a serde_json::Value) -> Option<HookFuture<'a>> {
        None
    }
}
