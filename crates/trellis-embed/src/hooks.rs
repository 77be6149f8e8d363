use trellis_runtime::{HookFuture, WidgetHooks};

/// Reference hooks implementation: logs each lifecycle phase instead of
/// mounting real UI. Useful for probing a platform's authorization endpoint
/// from the command line.
pub struct ConsoleWidget;

impl WidgetHooks for ConsoleWidget {
    fn on_init<'a>(&'a self, config: &'a serde_json::Value) -> HookFuture<'a> {
        Box::pin(async move {
            tracing::info!(config = %config, "Widget initialized");
            Ok(())
        })
    }

    fn on_render<'a>(&'a self, _config: &'a serde_json::Value) -> HookFuture<'a> {
        Box::pin(async move {
            tracing::info!("Widget rendered");
            Ok(())
        })
    }

    fn on_destroy<'a>(&'a self) -> HookFuture<'a> {
        Box::pin(async move {
            tracing::info!("Widget destroyed");
            Ok(())
        })
    }

    fn on_config_update<'a>(&'a self, config: &'a serde_json::Value) -> Option<HookFuture<'a>> {
        Some(Box::pin(async move {
            tracing::info!(config = %config, "Widget config updated in place");
            Ok(())
        }))
    }
}
