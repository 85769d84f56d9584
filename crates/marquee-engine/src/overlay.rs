//! Overlay manager: the single owner of "what is open", page scroll lock and focus.
//!
//! Exclusive overlays (modals) never coexist. Opening one closes the open one
//! first. Scroll lock is a count of open exclusive overlays, so a swap never
//! unlocks the page. Escape, backdrop clicks and close buttons all end up in
//! [`OverlayManager::close`].

use std::{collections::HashMap, fmt, sync::Arc};

use config::OverlaySpec;
use marquee_protocol::{Effect, ElementId, OverlayId, OverlayKind};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{EffectDispatcher, Error, Result, page::PageState};

/// Callback run when an overlay opens or closes.
pub type OverlayHook = Arc<dyn Fn(&OverlayId) + Send + Sync>;

/// A registered overlay.
#[derive(Clone)]
pub struct Overlay {
    /// Unique id.
    pub id: OverlayId,
    /// Modal or popup.
    pub kind: OverlayKind,
    /// Whether this overlay excludes every other exclusive overlay.
    pub exclusive: bool,
    /// First focusable element, focused on open.
    pub focus: Option<ElementId>,
    /// Whether a backdrop click closes it.
    pub backdrop_closes: bool,
    on_open: Option<OverlayHook>,
    on_close: Option<OverlayHook>,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("exclusive", &self.exclusive)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// An exclusive modal closed by its backdrop.
    pub fn modal(id: impl Into<OverlayId>) -> Self {
        Self {
            id: id.into(),
            kind: OverlayKind::Modal,
            exclusive: true,
            focus: None,
            backdrop_closes: true,
            on_open: None,
            on_close: None,
        }
    }

    /// A non-exclusive popup.
    pub fn popup(id: impl Into<OverlayId>) -> Self {
        Self {
            kind: OverlayKind::Popup,
            exclusive: false,
            backdrop_closes: false,
            ..Self::modal(id)
        }
    }

    /// Build from a configuration entry.
    pub fn from_spec(spec: &OverlaySpec) -> Self {
        let base = match spec.kind {
            OverlayKind::Modal => Self::modal(spec.id.clone()),
            OverlayKind::Popup => Self::popup(spec.id.clone()),
        };
        Self {
            exclusive: spec.is_exclusive(),
            focus: spec.focus.clone(),
            backdrop_closes: spec.backdrop_closes,
            ..base
        }
    }

    /// Set the element focused on open.
    pub fn with_focus(mut self, element: impl Into<ElementId>) -> Self {
        self.focus = Some(element.into());
        self
    }

    /// Override exclusivity.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Run `hook` after the overlay opens.
    pub fn on_open(mut self, hook: impl Fn(&OverlayId) + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after the overlay closes.
    pub fn on_close(mut self, hook: impl Fn(&OverlayId) + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(hook));
        self
    }
}

/// Observer interface for exclusive overlay transitions.
///
/// Called synchronously, outside the manager's lock, so observers may call
/// back into the manager.
pub trait OverlayObserver: Send + Sync {
    /// An exclusive overlay just opened.
    fn on_exclusive_opened(&self, _overlays: &OverlayManager, _id: &OverlayId) {}
    /// An exclusive overlay just closed.
    fn on_exclusive_closed(&self, _overlays: &OverlayManager, _id: &OverlayId) {}
}

struct Slot {
    overlay: Overlay,
    open: bool,
    /// Focus to restore on close.
    return_focus: Option<ElementId>,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<OverlayId, Slot>,
    /// Registration order, used by `close_all`.
    order: Vec<OverlayId>,
    exclusive: Option<OverlayId>,
    page: PageState,
}

/// Work collected under the lock and performed after releasing it.
#[derive(Default)]
struct Followup {
    effects: Vec<Effect>,
    hooks: Vec<(OverlayHook, OverlayId)>,
    opened: Option<OverlayId>,
    closed: Option<OverlayId>,
}

/// Single source of truth for overlay visibility.
#[derive(Clone)]
pub struct OverlayManager {
    inner: Arc<Mutex<Inner>>,
    observers: Arc<Mutex<Vec<Arc<dyn OverlayObserver>>>>,
    effects: EffectDispatcher,
}

impl OverlayManager {
    /// Create an empty manager emitting through `effects`.
    pub fn new(effects: EffectDispatcher) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            observers: Arc::new(Mutex::new(Vec::new())),
            effects,
        }
    }

    /// Add an overlay to the known set.
    pub fn register(&self, overlay: Overlay) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.slots.contains_key(&overlay.id) {
            return Err(Error::DuplicateOverlay(overlay.id));
        }
        debug!(overlay = %overlay.id, exclusive = overlay.exclusive, "overlay_register");
        inner.order.push(overlay.id.clone());
        inner.slots.insert(
            overlay.id.clone(),
            Slot {
                overlay,
                open: false,
                return_focus: None,
            },
        );
        Ok(())
    }

    /// Install an observer for exclusive open/close transitions.
    pub fn add_observer(&self, observer: Arc<dyn OverlayObserver>) {
        self.observers.lock().push(observer);
    }

    /// Open `id`, closing the open exclusive overlay first when `id` is exclusive.
    ///
    /// Unknown ids are logged and ignored.
    pub fn open(&self, id: &OverlayId) -> Result<()> {
        let follow = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let Some(slot) = inner.slots.get(id) else {
                warn!(error = %Error::UnknownOverlay(id.clone()), "overlay_open_missing");
                return Ok(());
            };
            if slot.open {
                trace!(overlay = %id, "overlay_open_noop");
                return Ok(());
            }
            let exclusive = slot.overlay.exclusive;
            let mut follow = Followup::default();
            // Only overlays that move focus owe it back.
            let mut return_focus = slot
                .overlay
                .focus
                .as_ref()
                .and_then(|_| inner.page.focused().cloned());

            if exclusive {
                // Take the new lock before releasing the old one so the count
                // never touches zero during a swap.
                if inner.page.lock_scroll() {
                    follow.effects.push(Effect::ScrollLock { locked: true });
                }
                if let Some(prev) = inner.exclusive.take()
                    && let Some(prev_slot) = inner.slots.get_mut(&prev)
                {
                    debug!(from = %prev, to = %id, "overlay_replace");
                    prev_slot.open = false;
                    // The replaced overlay's saved focus carries over.
                    if let Some(saved) = prev_slot.return_focus.take() {
                        return_focus = Some(saved);
                    }
                    follow.effects.push(Effect::OverlayVisibility {
                        overlay: prev.clone(),
                        visible: false,
                    });
                    if let Some(h) = &prev_slot.overlay.on_close {
                        follow.hooks.push((h.clone(), prev.clone()));
                    }
                    inner.page.unlock_scroll();
                    follow.closed = Some(prev);
                }
                inner.exclusive = Some(id.clone());
                follow.opened = Some(id.clone());
            }

            let Some(slot) = inner.slots.get_mut(id) else {
                return Ok(());
            };
            slot.open = true;
            slot.return_focus = return_focus;
            follow.effects.push(Effect::OverlayVisibility {
                overlay: id.clone(),
                visible: true,
            });
            if let Some(target) = slot.overlay.focus.clone() {
                inner.page.set_focused(Some(target.clone()));
                follow.effects.push(Effect::Focus { element: target });
            }
            if let Some(h) = &slot.overlay.on_open {
                follow.hooks.push((h.clone(), id.clone()));
            }
            debug!(overlay = %id, exclusive, "overlay_open");
            follow
        };
        self.finish(follow)
    }

    /// Close `id`, releasing its scroll lock and restoring focus.
    ///
    /// Unknown or already-closed ids are logged and ignored.
    pub fn close(&self, id: &OverlayId) -> Result<()> {
        let follow = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let Some(slot) = inner.slots.get_mut(id) else {
                warn!(error = %Error::UnknownOverlay(id.clone()), "overlay_close_missing");
                return Ok(());
            };
            if !slot.open {
                trace!(overlay = %id, "overlay_close_noop");
                return Ok(());
            }
            let mut follow = Followup::default();
            slot.open = false;
            follow.effects.push(Effect::OverlayVisibility {
                overlay: id.clone(),
                visible: false,
            });
            let restore = slot.return_focus.take();
            if let Some(h) = &slot.overlay.on_close {
                follow.hooks.push((h.clone(), id.clone()));
            }
            if slot.overlay.exclusive {
                if inner.exclusive.as_ref() == Some(id) {
                    inner.exclusive = None;
                }
                if inner.page.unlock_scroll() {
                    follow.effects.push(Effect::ScrollLock { locked: false });
                }
                follow.closed = Some(id.clone());
            }
            if let Some(element) = restore {
                inner.page.set_focused(Some(element.clone()));
                follow.effects.push(Effect::Focus { element });
            }
            debug!(overlay = %id, "overlay_close");
            follow
        };
        self.finish(follow)
    }

    /// Close every open overlay (teardown).
    pub fn close_all(&self) -> Result<()> {
        let open: Vec<OverlayId> = {
            let inner = self.inner.lock();
            inner
                .order
                .iter()
                .filter(|id| inner.slots.get(*id).is_some_and(|s| s.open))
                .cloned()
                .collect()
        };
        for id in &open {
            self.close(id)?;
        }
        Ok(())
    }

    /// Id of the open exclusive overlay, if any.
    pub fn current_exclusive(&self) -> Option<OverlayId> {
        self.inner.lock().exclusive.clone()
    }

    /// Whether `id` is currently open.
    pub fn is_open(&self, id: &OverlayId) -> bool {
        self.inner.lock().slots.get(id).is_some_and(|s| s.open)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &OverlayId) -> bool {
        self.inner.lock().slots.contains_key(id)
    }

    /// Whether a backdrop click should close `id`.
    pub fn closes_on_backdrop(&self, id: &OverlayId) -> bool {
        self.inner
            .lock()
            .slots
            .get(id)
            .is_some_and(|s| s.overlay.backdrop_closes)
    }

    /// Whether the page scroll is locked.
    pub fn scroll_locked(&self) -> bool {
        self.inner.lock().page.scroll_locks() > 0
    }

    /// Number of scroll locks currently held.
    pub fn scroll_lock_count(&self) -> usize {
        self.inner.lock().page.scroll_locks()
    }

    /// Number of open exclusive overlays.
    pub fn open_exclusive_count(&self) -> usize {
        self.inner
            .lock()
            .slots
            .values()
            .filter(|s| s.open && s.overlay.exclusive)
            .count()
    }

    /// Element currently holding focus, as far as the engine knows.
    pub fn focused(&self) -> Option<ElementId> {
        self.inner.lock().page.focused().cloned()
    }

    /// Move focus to `element`. Other components go through here rather than
    /// emitting focus effects themselves.
    pub fn focus(&self, element: &ElementId) -> Result<()> {
        self.inner.lock().page.set_focused(Some(element.clone()));
        self.effects.emit(Effect::Focus {
            element: element.clone(),
        })
    }

    /// Record a focus change reported by the host.
    pub fn note_focus(&self, element: Option<ElementId>) {
        self.inner.lock().page.set_focused(element);
    }

    fn finish(&self, follow: Followup) -> Result<()> {
        self.effects.emit_all(follow.effects)?;
        for (hook, id) in &follow.hooks {
            hook(id);
        }
        if follow.closed.is_none() && follow.opened.is_none() {
            return Ok(());
        }
        let observers: Vec<Arc<dyn OverlayObserver>> = self.observers.lock().clone();
        for obs in &observers {
            if let Some(id) = &follow.closed {
                obs.on_exclusive_closed(self, id);
            }
            if let Some(id) = &follow.opened {
                obs.on_exclusive_opened(self, id);
            }
        }
        Ok(())
    }
}
