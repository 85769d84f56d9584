use std::result::Result as StdResult;

use marquee_protocol::{CarouselId, FormId, OverlayId};
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the marquee engine.
#[derive(Debug, Error)]
pub enum Error {
    /// An overlay id was registered twice. Fatal at registration time.
    #[error("overlay '{0}' is already registered")]
    DuplicateOverlay(OverlayId),

    /// An operation named an overlay that was never registered.
    #[error("unknown overlay '{0}'")]
    UnknownOverlay(OverlayId),

    /// An operation named a carousel that does not exist.
    #[error("unknown carousel '{0}'")]
    UnknownCarousel(CarouselId),

    /// An operation named a form that does not exist.
    #[error("unknown form '{0}'")]
    UnknownForm(FormId),

    /// The host dropped its effect receiver.
    #[error("effect channel closed")]
    ChannelClosed,

    /// The submission collaborator rejected a validated form.
    #[error("submission of form '{form}' failed: {message}")]
    Submit {
        /// Form that failed to submit.
        form: FormId,
        /// Collaborator's explanation.
        message: String,
    },
}

impl Error {
    /// True for errors that only name a missing target. These are logged and
    /// otherwise treated as no-ops.
    pub fn is_missing_target(&self) -> bool {
        matches!(
            self,
            Self::UnknownOverlay(_) | Self::UnknownCarousel(_) | Self::UnknownForm(_)
        )
    }
}
