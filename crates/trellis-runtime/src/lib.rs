//! Widget lifecycle runtime for Trellis.
//!
//! Provides [`WidgetRuntime`], the state machine driving an embedded widget
//! through start, stop, and reload, on top of the authorization flow from
//! `trellis-auth`. The widget itself is supplied as a [`WidgetHooks`]
//! implementation.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use trellis_core::WidgetIdentity;
//! use trellis_runtime::{HookFuture, WidgetHooks, WidgetRuntime};
//!
//! struct Banner;
//!
//! impl WidgetHooks for Banner {
//!     fn on_init<'a>(&'a self, config: &'a serde_json::Value) -> HookFuture<'a> {
//!         Box::pin(async move {
//!             println!("init with {config}");
//!             Ok(())
//!         })
//!     }
//!
//!     fn on_render<'a>(&'a self, _config: &'a serde_json::Value) -> HookFuture<'a> {
//!         Box::pin(async { Ok(()) })
//!     }
//!
//!     fn on_destroy<'a>(&'a self) -> HookFuture<'a> {
//!         Box::pin(async { Ok(()) })
//!     }
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let identity = WidgetIdentity::new(
//!     "site-1",
//!     "app-1",
//!     "https://platform.example",
//!     "banner",
//!     "1.0.0",
//! )?;
//!
//! let mut runtime = WidgetRuntime::builder(identity, Banner).build();
//! runtime.start().await; // authorizes, then on_init + on_render
//! runtime.stop().await; // on_destroy
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod readiness;
pub mod telemetry;

pub use error::WidgetError;
pub use hooks::{HookFuture, WidgetHooks};
pub use lifecycle::{LifecycleState, WidgetRuntime, WidgetRuntimeBuilder};
pub use readiness::{ReadyNotifier, ReadySignal};
pub use telemetry::{AnalyticsEvent, EventSink, HttpSink, NullSink};
