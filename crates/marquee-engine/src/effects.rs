use marquee_protocol::{CarouselId, Effect, ElementId, SlideSet};
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::{Error, Result};

/// Sends outbound DOM effects to the host page.
#[derive(Clone)]
pub struct EffectDispatcher {
    tx: UnboundedSender<Effect>,
}

impl EffectDispatcher {
    /// Create a new dispatcher from the host's effect channel.
    pub fn new(tx: UnboundedSender<Effect>) -> Self {
        Self { tx }
    }

    /// Send a single effect.
    pub fn emit(&self, effect: Effect) -> Result<()> {
        trace!(effect = ?effect, "effect");
        self.tx.send(effect).map_err(|_| Error::ChannelClosed)
    }

    /// Send effects in order, stopping at the first failure.
    pub fn emit_all(&self, effects: impl IntoIterator<Item = Effect>) -> Result<()> {
        effects.into_iter().try_for_each(|e| self.emit(e))
    }

    /// Mark exactly one slide (and its indicator) active.
    pub fn active_slide(
        &self,
        carousel: &CarouselId,
        set: SlideSet,
        index: usize,
        element: &ElementId,
    ) -> Result<()> {
        self.emit(Effect::ActiveSlide {
            carousel: carousel.clone(),
            set,
            index,
            element: element.clone(),
        })
    }
}
