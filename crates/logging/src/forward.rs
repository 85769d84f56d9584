//! Forward tracing events to the host page.
//!
//! A page host has no terminal; it wants engine logs on its console. This
//! module provides a small tracing [`Layer`] that forwards log events over
//! the engine's effect channel as [`Effect::Log`] when a sink is set.
//!
//! Usage:
//! - Call [`set_sink`] with the effect sender handed to the engine.
//! - Install the [`layer`] in your tracing subscriber.
//! - Call [`clear_sink`] on teardown.
//!
//! The layer no-ops when no sink is set.

use std::sync::OnceLock;

use marquee_protocol::Effect;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// A global sink that, when present, receives forwarded logs.
static LOG_SINK: OnceLock<Mutex<Option<UnboundedSender<Effect>>>> = OnceLock::new();

/// Access the global sink.
fn sink() -> &'static Mutex<Option<UnboundedSender<Effect>>> {
    LOG_SINK.get_or_init(|| Mutex::new(None))
}

/// Set the forwarding sink.
pub fn set_sink(tx: UnboundedSender<Effect>) {
    *sink().lock() = Some(tx);
}

/// Clear the forwarding sink.
pub fn clear_sink() {
    *sink().lock() = None;
}

/// Tracing layer that forwards events to the host when a sink is set.
pub struct ForwardLayer;

impl<S> Layer<S> for ForwardLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let tx_opt = { sink().lock().clone() };
        let Some(tx) = tx_opt else { return };

        let r = logfmt::render_event(event);
        let log = Effect::Log {
            level: r.level,
            target: r.target,
            message: r.message,
        };
        if tx.send(log).is_err() {
            // Host went away; clear to avoid repeated work.
            clear_sink();
        }
    }
}

/// Create the forwarding layer instance to add to your subscriber.
pub fn layer() -> ForwardLayer {
    ForwardLayer
}
