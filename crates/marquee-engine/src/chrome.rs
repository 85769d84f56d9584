//! Page chrome: mobile menu, scroll-driven navbar and back-to-top button,
//! anchor scrolling, the hero image swap, reveal-on-scroll and animation
//! pausing.

use std::{
    collections::HashSet,
    mem,
    sync::{Arc, Weak},
    time::Duration,
};

use config::{HeroSpec, Options, slide_set_for};
use marquee_protocol::{Effect, ElementId, SlideSet};
use parking_lot::Mutex;
use tracing::trace;

use crate::{EffectDispatcher, Result, TimerKind, TimerRegistry};

const THROTTLE_KEY: &str = "scroll:throttle";

/// Scroll thresholds and throttle window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeTimings {
    /// Minimum spacing between processed scroll positions.
    pub scroll_throttle: Duration,
    /// Back-to-top shows below this offset.
    pub back_to_top_offset: f64,
    /// The navbar may hide below this offset.
    pub navbar_hide_offset: f64,
    /// Space kept above a section scrolled to from an anchor link.
    pub anchor_offset: u32,
    /// Widths at or below this use the mobile hero image.
    pub mobile_breakpoint_px: u32,
}

impl From<&Options> for ChromeTimings {
    fn from(o: &Options) -> Self {
        Self {
            scroll_throttle: o.scroll_throttle(),
            back_to_top_offset: f64::from(o.back_to_top_offset_px),
            navbar_hide_offset: f64::from(o.navbar_hide_offset_px),
            anchor_offset: o.navbar_height_px.saturating_add(o.anchor_margin_px),
            mobile_breakpoint_px: o.mobile_breakpoint_px,
        }
    }
}

impl Default for ChromeTimings {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

#[derive(Default)]
struct Inner {
    menu_open: bool,
    last_y: f64,
    /// Latest position seen inside the throttle window.
    pending_y: Option<f64>,
    back_to_top: bool,
    navbar_hidden: bool,
    revealed: HashSet<ElementId>,
    animations_paused: bool,
    hero: Option<HeroSpec>,
    hero_layout: Option<SlideSet>,
}

struct Shared {
    timings: ChromeTimings,
    timers: TimerRegistry,
    effects: EffectDispatcher,
    inner: Mutex<Inner>,
}

/// Page chrome controller.
#[derive(Clone)]
pub struct Chrome {
    shared: Arc<Shared>,
}

impl Chrome {
    /// Build the controller. Nothing is emitted until the first signal.
    pub fn new(timings: ChromeTimings, timers: TimerRegistry, effects: EffectDispatcher) -> Self {
        Self {
            shared: Arc::new(Shared {
                timings,
                timers,
                effects,
                inner: Mutex::new(Inner::default()),
            }),
        }
    }

    /// Whether the mobile menu is expanded.
    pub fn menu_open(&self) -> bool {
        self.shared.inner.lock().menu_open
    }

    /// Flip the mobile menu.
    pub fn toggle_menu(&self) -> Result<()> {
        let expanded = {
            let mut inner = self.shared.inner.lock();
            inner.menu_open = !inner.menu_open;
            inner.menu_open
        };
        self.shared.effects.emit(Effect::MenuExpanded { expanded })
    }

    /// Collapse the mobile menu. Returns whether it was open.
    pub fn close_menu(&self) -> Result<bool> {
        let was_open = mem::take(&mut self.shared.inner.lock().menu_open);
        if was_open {
            self.shared
                .effects
                .emit(Effect::MenuExpanded { expanded: false })?;
        }
        Ok(was_open)
    }

    /// Page scrolled to `y`. The first position in a throttle window is
    /// applied at once, the last one when the window closes.
    pub fn on_scroll(&self, y: f64) -> Result<()> {
        if self.shared.timers.is_active(THROTTLE_KEY) {
            self.shared.inner.lock().pending_y = Some(y);
            return Ok(());
        }
        self.apply_scroll(y)?;
        self.arm_throttle();
        Ok(())
    }

    fn arm_throttle(&self) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        self.shared.timers.schedule(
            THROTTLE_KEY,
            TimerKind::Timeout,
            self.shared.timings.scroll_throttle,
            move || {
                let Some(shared) = weak.upgrade() else {
                    return Ok(());
                };
                let chrome = Chrome { shared };
                let pending = chrome.shared.inner.lock().pending_y.take();
                if let Some(y) = pending {
                    chrome.apply_scroll(y)?;
                    chrome.arm_throttle();
                }
                Ok(())
            },
        );
    }

    fn apply_scroll(&self, y: f64) -> Result<()> {
        let t = &self.shared.timings;
        let mut effects = Vec::new();
        {
            let mut inner = self.shared.inner.lock();
            let back_to_top = y > t.back_to_top_offset;
            if back_to_top != inner.back_to_top {
                inner.back_to_top = back_to_top;
                effects.push(Effect::BackToTopVisible {
                    visible: back_to_top,
                });
            }
            let hidden = y > inner.last_y && y > t.navbar_hide_offset;
            if hidden != inner.navbar_hidden {
                inner.navbar_hidden = hidden;
                effects.push(Effect::NavbarHidden { hidden });
            }
            inner.last_y = y;
        }
        trace!(y, "scroll_applied");
        self.shared.effects.emit_all(effects)
    }

    /// Declare the hero background pair swapped at the mobile breakpoint.
    pub fn set_hero(&self, hero: HeroSpec) {
        let mut inner = self.shared.inner.lock();
        inner.hero = Some(hero);
        inner.hero_layout = None;
    }

    /// Viewport settled at `width`: display the matching hero image and hide
    /// the other. Emits only when the layout flips.
    pub fn on_viewport_change(&self, width: u32) -> Result<()> {
        let layout = slide_set_for(width, self.shared.timings.mobile_breakpoint_px);
        let effects = {
            let mut inner = self.shared.inner.lock();
            let Some(hero) = inner.hero.clone() else {
                return Ok(());
            };
            if inner.hero_layout == Some(layout) {
                return Ok(());
            }
            inner.hero_layout = Some(layout);
            let mobile = layout == SlideSet::Mobile;
            vec![
                Effect::Displayed {
                    element: hero.desktop,
                    displayed: !mobile,
                },
                Effect::Displayed {
                    element: hero.mobile,
                    displayed: mobile,
                },
            ]
        };
        trace!(layout = %layout, "hero_layout");
        self.shared.effects.emit_all(effects)
    }

    /// Scroll to a section at document offset `offset`, leaving room for the
    /// fixed navbar. Focusing the section is the caller's job.
    pub fn scroll_to_anchor(&self, offset: u32) -> Result<()> {
        let y = offset.saturating_sub(self.shared.timings.anchor_offset);
        self.shared.effects.emit(Effect::ScrollTo { y })
    }

    /// Scroll back to the top of the page.
    pub fn back_to_top(&self) -> Result<()> {
        self.shared.effects.emit(Effect::ScrollTo { y: 0 })
    }

    /// `element` scrolled into view. Revealed once.
    pub fn reveal(&self, element: &ElementId) -> Result<()> {
        if !self.shared.inner.lock().revealed.insert(element.clone()) {
            return Ok(());
        }
        self.shared.effects.emit(Effect::Reveal {
            element: element.clone(),
        })
    }

    /// Pause decorative animations while the page is hidden.
    pub fn on_visibility(&self, hidden: bool) -> Result<()> {
        let changed = {
            let mut inner = self.shared.inner.lock();
            let changed = inner.animations_paused != hidden;
            inner.animations_paused = hidden;
            changed
        };
        if changed {
            self.shared
                .effects
                .emit(Effect::AnimationsPaused { paused: hidden })?;
        }
        Ok(())
    }
}
