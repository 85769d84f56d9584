//! Promotional popup scheduler.
//!
//! The popup cycles on a repeating timer, hides itself after a while, backs
//! off for a cooldown when dismissed and never competes with an exclusive
//! overlay: it will not show while one is open and is hidden the moment one
//! opens.

use std::{
    mem,
    sync::{Arc, Weak},
    time::Duration,
};

use config::Options;
use marquee_protocol::OverlayId;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::{OverlayManager, OverlayObserver, Result, TimerKind, TimerRegistry};

const CYCLE_KEY: &str = "popup:cycle";
const AUTOHIDE_KEY: &str = "popup:autohide";

/// Observable popup state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopupState {
    /// The popup is on screen.
    pub visible: bool,
    /// Scheduled shows are ignored until this instant.
    pub dismissed_until: Option<Instant>,
}

/// Phase of the popup state machine at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    /// Waiting for the next cycle.
    Idle,
    /// On screen.
    Showing,
    /// Dismissed; cycles are ignored until `until`.
    Suppressed {
        /// End of the cooldown.
        until: Instant,
    },
}

impl PopupState {
    /// Phase at `now`.
    pub fn phase(&self, now: Instant) -> PopupPhase {
        if self.visible {
            return PopupPhase::Showing;
        }
        match self.dismissed_until {
            Some(until) if until > now => PopupPhase::Suppressed { until },
            _ => PopupPhase::Idle,
        }
    }
}

/// Popup durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupTimings {
    /// Delay before the first show.
    pub initial_delay: Duration,
    /// Period between shows.
    pub repeat: Duration,
    /// Time on screen before hiding itself.
    pub auto_hide: Duration,
    /// Quiet period after a dismiss.
    pub cooldown: Duration,
}

impl From<&Options> for PopupTimings {
    fn from(o: &Options) -> Self {
        Self {
            initial_delay: o.popup_initial_delay(),
            repeat: o.popup_repeat(),
            auto_hide: o.popup_auto_hide(),
            cooldown: o.popup_cooldown(),
        }
    }
}

impl Default for PopupTimings {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

#[derive(Default)]
struct Inner {
    state: PopupState,
    started: bool,
    page_hidden: bool,
    /// The visitor clicked through; the popup is done for this page.
    engaged: bool,
}

struct Core {
    overlay: OverlayId,
    timings: PopupTimings,
    overlays: OverlayManager,
    timers: TimerRegistry,
    inner: Mutex<Inner>,
}

/// Forces the popup idle when an exclusive overlay opens.
struct PopupWatch(Weak<Core>);

impl OverlayObserver for PopupWatch {
    fn on_exclusive_opened(&self, _overlays: &OverlayManager, id: &OverlayId) {
        if let Some(core) = self.0.upgrade() {
            trace!(overlay = %id, "popup_yield");
            if let Err(e) = (Popup { core }).hide() {
                warn!(error = %e, "popup_yield_failed");
            }
        }
    }
}

/// Popup scheduler.
#[derive(Clone)]
pub struct Popup {
    core: Arc<Core>,
}

impl Popup {
    /// Create a scheduler for the (non-exclusive) overlay `overlay`.
    pub fn new(
        overlay: impl Into<OverlayId>,
        timings: PopupTimings,
        overlays: OverlayManager,
        timers: TimerRegistry,
    ) -> Self {
        let core = Arc::new(Core {
            overlay: overlay.into(),
            timings,
            overlays,
            timers,
            inner: Mutex::new(Inner::default()),
        });
        core.overlays
            .add_observer(Arc::new(PopupWatch(Arc::downgrade(&core))));
        Self { core }
    }

    /// Overlay the popup shows.
    pub fn overlay(&self) -> &OverlayId {
        &self.core.overlay
    }

    /// Current state.
    pub fn state(&self) -> PopupState {
        self.core.inner.lock().state
    }

    /// Current phase.
    pub fn phase(&self) -> PopupPhase {
        self.state().phase(Instant::now())
    }

    /// Whether the popup is on screen.
    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    /// Begin the show cycle.
    pub fn start(&self) {
        self.core.inner.lock().started = true;
        self.schedule_cycle(self.core.timings.initial_delay);
    }

    fn schedule_cycle(&self, initial: Duration) {
        let c = &self.core;
        {
            let inner = c.inner.lock();
            if inner.engaged || inner.page_hidden || !inner.started {
                return;
            }
        }
        let weak = Arc::downgrade(&self.core);
        c.timers
            .schedule_repeating(CYCLE_KEY, initial, c.timings.repeat, move || {
                match weak.upgrade() {
                    Some(core) => Popup { core }.try_show().map(|_| ()),
                    None => Ok(()),
                }
            });
        debug!(initial_ms = initial.as_millis() as u64, "popup_cycle_scheduled");
    }

    /// Show the popup unless something holds it back. Returns whether it showed.
    pub fn try_show(&self) -> Result<bool> {
        let c = &self.core;
        let now = Instant::now();
        {
            let mut inner = c.inner.lock();
            if inner.engaged || inner.page_hidden || inner.state.visible {
                trace!("popup_show_skip");
                return Ok(false);
            }
            match inner.state.dismissed_until {
                Some(until) if until > now => {
                    trace!("popup_show_suppressed");
                    return Ok(false);
                }
                Some(_) => inner.state.dismissed_until = None,
                None => {}
            }
        }
        if let Some(open) = c.overlays.current_exclusive() {
            trace!(overlay = %open, "popup_show_blocked");
            return Ok(false);
        }
        c.overlays.open(&c.overlay)?;
        c.inner.lock().state.visible = true;
        let weak = Arc::downgrade(&self.core);
        c.timers
            .schedule(AUTOHIDE_KEY, TimerKind::Timeout, c.timings.auto_hide, move || {
                match weak.upgrade() {
                    Some(core) => Popup { core }.hide(),
                    None => Ok(()),
                }
            });
        debug!(overlay = %c.overlay, "popup_show");
        Ok(true)
    }

    /// Hide without starting a cooldown (auto-hide, forced idle).
    pub fn hide(&self) -> Result<()> {
        let c = &self.core;
        let was_visible = mem::replace(&mut c.inner.lock().state.visible, false);
        c.timers.cancel(AUTOHIDE_KEY);
        if was_visible {
            debug!(overlay = %c.overlay, "popup_hide");
            c.overlays.close(&c.overlay)?;
        }
        Ok(())
    }

    /// Visitor closed the popup: hide and suppress shows for the cooldown.
    pub fn dismiss(&self) -> Result<()> {
        let until = Instant::now() + self.core.timings.cooldown;
        self.core.inner.lock().state.dismissed_until = Some(until);
        debug!(cooldown_ms = self.core.timings.cooldown.as_millis() as u64, "popup_dismiss");
        self.hide()
    }

    /// Visitor followed the call to action: hide and stop for good.
    pub fn engage(&self) -> Result<()> {
        self.core.inner.lock().engaged = true;
        self.core.timers.cancel(CYCLE_KEY);
        debug!("popup_engaged");
        self.hide()
    }

    /// Page visibility changed. Hiding pauses the cycle and keeps any cooldown;
    /// showing resumes it after the remaining cooldown, or the initial delay.
    pub fn on_visibility(&self, hidden: bool) {
        let now = Instant::now();
        let resume_in = {
            let mut inner = self.core.inner.lock();
            if inner.page_hidden == hidden {
                trace!(hidden, "popup_visibility_unchanged");
                return;
            }
            inner.page_hidden = hidden;
            match inner.state.dismissed_until {
                Some(until) if until > now => until - now,
                _ => self.core.timings.initial_delay,
            }
        };
        if hidden {
            self.core.timers.cancel(CYCLE_KEY);
            trace!("popup_cycle_paused");
        } else {
            self.schedule_cycle(resume_in);
        }
    }
}
