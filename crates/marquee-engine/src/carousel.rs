//! Carousel controller.
//!
//! Index arithmetic lives in the pure [`CarouselState`]; [`Carousel`] wraps it
//! with the auto-advance timer, the settle window and the pause triggers
//! (pointer, touch, page visibility, reduced motion).

use std::{sync::Arc, time::Duration};

use config::{CarouselSpec, Options, SlideSpec, slide_set_for};
use marquee_protocol::{CarouselId, Effect, ElementId, SlideSet};
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::{EffectDispatcher, Result, TimerKind, TimerRegistry};

/// One slide: its element and optional background image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Slide element id.
    pub element: ElementId,
    /// Background image URL applied on first render.
    pub background: Option<String>,
}

impl Slide {
    /// A slide without a background.
    pub fn new(element: impl Into<ElementId>) -> Self {
        Self {
            element: element.into(),
            background: None,
        }
    }
}

impl From<&SlideSpec> for Slide {
    fn from(spec: &SlideSpec) -> Self {
        Self {
            element: spec.element.clone(),
            background: spec.background.clone(),
        }
    }
}

/// Desktop slides plus an optional mobile alternative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slides {
    desktop: Vec<Slide>,
    mobile: Vec<Slide>,
}

impl Slides {
    /// Build from both sets. An empty mobile set means "use desktop everywhere".
    pub fn new(desktop: Vec<Slide>, mobile: Vec<Slide>) -> Self {
        Self { desktop, mobile }
    }

    /// Slides in `set`.
    pub fn get(&self, set: SlideSet) -> &[Slide] {
        match set {
            SlideSet::Desktop => &self.desktop,
            SlideSet::Mobile => &self.mobile,
        }
    }

    /// The set actually used when `wanted` is requested.
    pub fn effective(&self, wanted: SlideSet) -> SlideSet {
        match wanted {
            SlideSet::Mobile if !self.mobile.is_empty() => SlideSet::Mobile,
            _ => SlideSet::Desktop,
        }
    }

    fn all(&self) -> impl Iterator<Item = &Slide> {
        self.desktop.iter().chain(self.mobile.iter())
    }
}

/// Wrap `index` into `0..len`. `None` for an empty set.
pub fn wrap(index: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| index % len)
}

/// Index after `current`, wrapping to 0.
pub fn next_index(current: usize, len: usize) -> Option<usize> {
    wrap(current.checked_add(1)?, len)
}

/// Index before `current`, wrapping to the end.
pub fn prev_index(current: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| (current % len + len - 1) % len)
}

/// Clamp `current` into a set of `len` slides, keeping the position where possible.
pub fn clamp(current: usize, len: usize) -> usize {
    current.min(len.saturating_sub(1))
}

/// Pure carousel state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarouselState {
    /// Active slide index in `set`.
    pub current: usize,
    /// Paused by pointer or touch interaction.
    pub paused: bool,
    /// A transition is settling; further navigation is dropped.
    pub transitioning: bool,
    /// Active slide set.
    pub set: SlideSet,
}

impl CarouselState {
    /// Begin a transition to `index` in a set of `len` slides.
    ///
    /// Returns the wrapped target, or `None` when the set is empty or a
    /// transition is already in flight.
    pub fn begin(&mut self, index: usize, len: usize) -> Option<usize> {
        if self.transitioning {
            return None;
        }
        let target = wrap(index, len)?;
        self.current = target;
        self.transitioning = true;
        Some(target)
    }

    /// The settle window ended.
    pub fn settle(&mut self) {
        self.transitioning = false;
    }
}

/// Durations and thresholds a carousel runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselTimings {
    /// Auto-advance period.
    pub auto_advance: Duration,
    /// Settle window after a transition.
    pub settle: Duration,
    /// Minimum horizontal travel for a swipe.
    pub swipe_threshold_px: f64,
    /// Maximum duration of a swipe.
    pub swipe_max: Duration,
    /// Delay before resuming after a non-swipe touch.
    pub resume_after_touch: Duration,
    /// Widths at or below this use the mobile set.
    pub mobile_breakpoint_px: u32,
}

impl From<&Options> for CarouselTimings {
    fn from(o: &Options) -> Self {
        Self {
            auto_advance: o.auto_advance(),
            settle: o.transition_settle(),
            swipe_threshold_px: f64::from(o.swipe_threshold_px),
            swipe_max: o.swipe_max(),
            resume_after_touch: o.resume_after_touch(),
            mobile_breakpoint_px: o.mobile_breakpoint_px,
        }
    }
}

impl Default for CarouselTimings {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

#[derive(Default)]
struct Inner {
    state: CarouselState,
    /// Auto-advance requested by `start`.
    auto: bool,
    reduced_motion: bool,
    page_hidden: bool,
    touch: Option<(f64, Instant)>,
    key_scope: Option<String>,
}

struct Shared {
    id: CarouselId,
    slides: Slides,
    timings: CarouselTimings,
    timers: TimerRegistry,
    effects: EffectDispatcher,
    advance_key: String,
    settle_key: String,
    resume_key: String,
    inner: Mutex<Inner>,
}

/// A running carousel. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct Carousel {
    shared: Arc<Shared>,
}

impl Carousel {
    /// Create a carousel over `slides`.
    pub fn new(
        id: impl Into<CarouselId>,
        slides: Slides,
        timings: CarouselTimings,
        timers: TimerRegistry,
        effects: EffectDispatcher,
    ) -> Self {
        let id = id.into();
        Self {
            shared: Arc::new(Shared {
                advance_key: format!("carousel:{id}:advance"),
                settle_key: format!("carousel:{id}:settle"),
                resume_key: format!("carousel:{id}:resume"),
                id,
                slides,
                timings,
                timers,
                effects,
                inner: Mutex::new(Inner::default()),
            }),
        }
    }

    /// Build from a configuration entry.
    pub fn from_spec(
        spec: &CarouselSpec,
        options: &Options,
        timers: TimerRegistry,
        effects: EffectDispatcher,
    ) -> Self {
        let mut timings = CarouselTimings::from(options);
        if let Some(ms) = spec.auto_advance_ms {
            timings.auto_advance = Duration::from_millis(ms);
        }
        let slides = Slides::new(
            spec.slides.iter().map(Slide::from).collect(),
            spec.mobile_slides.iter().map(Slide::from).collect(),
        );
        let carousel = Self::new(spec.id.clone(), slides, timings, timers, effects);
        carousel.set_key_scope(spec.key_scope.clone());
        carousel
    }

    /// Restrict arrow-key navigation to signals tagged with `scope`.
    pub fn set_key_scope(&self, scope: Option<String>) {
        self.shared.inner.lock().key_scope = scope;
    }

    /// Carousel id.
    pub fn id(&self) -> &CarouselId {
        &self.shared.id
    }

    /// Snapshot of the pure state.
    pub fn state(&self) -> CarouselState {
        self.shared.inner.lock().state
    }

    /// Active slide index.
    pub fn current(&self) -> usize {
        self.state().current
    }

    /// Active slide set.
    pub fn active_set(&self) -> SlideSet {
        self.state().set
    }

    /// Number of slides in the active set.
    pub fn len(&self) -> usize {
        self.shared.slides.get(self.active_set()).len()
    }

    /// Whether the active set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the auto-advance timer is pending.
    pub fn is_running(&self) -> bool {
        self.shared.timers.is_active(&self.shared.advance_key)
    }

    /// Whether arrow keys from `scope` drive this carousel.
    pub fn accepts_keys_from(&self, scope: Option<&str>) -> bool {
        match &self.shared.inner.lock().key_scope {
            None => true,
            Some(own) => scope == Some(own.as_str()),
        }
    }

    /// Apply slide backgrounds and mark the current slide active.
    pub fn render(&self) -> Result<()> {
        let backgrounds = self.shared.slides.all().filter_map(|s| {
            s.background.as_ref().map(|url| Effect::SlideBackground {
                element: s.element.clone(),
                url: url.clone(),
            })
        });
        self.shared.effects.emit_all(backgrounds)?;
        self.emit_active()
    }

    fn emit_active(&self) -> Result<()> {
        let state = self.state();
        let Some(slide) = self.shared.slides.get(state.set).get(state.current) else {
            return Ok(());
        };
        self.shared
            .effects
            .active_slide(&self.shared.id, state.set, state.current, &slide.element)
    }

    /// Transition to `index` (wrapped). Returns whether the transition was accepted.
    ///
    /// Dropped while another transition is settling; a no-op on an empty set.
    pub fn go_to(&self, index: usize) -> Result<bool> {
        let s = &self.shared;
        let (set, target) = {
            let mut inner = s.inner.lock();
            let set = inner.state.set;
            let len = s.slides.get(set).len();
            if len == 0 {
                warn!(carousel = %s.id, "carousel_empty");
                return Ok(false);
            }
            let Some(target) = inner.state.begin(index, len) else {
                trace!(carousel = %s.id, index, "carousel_drop_in_flight");
                return Ok(false);
            };
            (set, target)
        };
        debug!(carousel = %s.id, index = target, set = %set, "carousel_go_to");
        let weak = Arc::downgrade(&self.shared);
        s.timers
            .schedule(s.settle_key.clone(), TimerKind::Timeout, s.timings.settle, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.inner.lock().state.settle();
                }
                Ok(())
            });
        if let Some(slide) = s.slides.get(set).get(target) {
            s.effects.active_slide(&s.id, set, target, &slide.element)?;
        }
        Ok(true)
    }

    /// Advance one slide.
    pub fn next(&self) -> Result<bool> {
        self.go_to(next_index(self.current(), self.len()).unwrap_or(0))
    }

    /// Go back one slide.
    pub fn prev(&self) -> Result<bool> {
        self.go_to(prev_index(self.current(), self.len()).unwrap_or(0))
    }

    /// User navigation to `index`; restarts auto-advance when accepted.
    pub fn manual_go_to(&self, index: usize) -> Result<bool> {
        let accepted = self.go_to(index)?;
        if accepted {
            self.resume();
        }
        Ok(accepted)
    }

    /// User navigation forward.
    pub fn manual_next(&self) -> Result<bool> {
        let accepted = self.next()?;
        if accepted {
            self.resume();
        }
        Ok(accepted)
    }

    /// User navigation back.
    pub fn manual_prev(&self) -> Result<bool> {
        let accepted = self.prev()?;
        if accepted {
            self.resume();
        }
        Ok(accepted)
    }

    /// Request auto-advance. Deferred while paused, hidden or reduced motion.
    pub fn start(&self) {
        self.shared.inner.lock().auto = true;
        self.resume();
    }

    /// Stop auto-advance until the next `start`.
    pub fn stop(&self) {
        self.shared.inner.lock().auto = false;
        self.shared.timers.cancel(&self.shared.advance_key);
        debug!(carousel = %self.shared.id, "carousel_stop");
    }

    /// (Re)schedule the advance timer if nothing holds it back.
    fn resume(&self) {
        let s = &self.shared;
        {
            let inner = s.inner.lock();
            let blocked = !inner.auto
                || inner.reduced_motion
                || inner.page_hidden
                || inner.state.paused
                || s.slides.get(inner.state.set).len() < 2;
            if blocked {
                drop(inner);
                s.timers.cancel(&s.advance_key);
                return;
            }
        }
        let weak = Arc::downgrade(&self.shared);
        s.timers.schedule(
            s.advance_key.clone(),
            TimerKind::Interval,
            s.timings.auto_advance,
            move || match weak.upgrade() {
                Some(shared) => Carousel { shared }.next().map(|_| ()),
                None => Ok(()),
            },
        );
        trace!(carousel = %s.id, "carousel_advance_scheduled");
    }

    fn set_paused(&self, paused: bool) {
        self.shared.inner.lock().state.paused = paused;
        if paused {
            self.shared.timers.cancel(&self.shared.advance_key);
        } else {
            self.resume();
        }
    }

    /// Pointer entered the carousel: pause.
    pub fn pointer_enter(&self) {
        self.shared.timers.cancel(&self.shared.resume_key);
        self.set_paused(true);
    }

    /// Pointer left the carousel: resume.
    pub fn pointer_leave(&self) {
        self.set_paused(false);
    }

    /// Touch began at `x`: pause and remember the start.
    pub fn touch_start(&self, x: f64) {
        self.shared.inner.lock().touch = Some((x, Instant::now()));
        self.shared.timers.cancel(&self.shared.resume_key);
        self.set_paused(true);
    }

    /// Touch ended at `x`. A fast, long horizontal move navigates; anything
    /// else resumes auto-advance after a short delay.
    pub fn touch_end(&self, x: f64) -> Result<()> {
        let s = &self.shared;
        let Some((start_x, at)) = s.inner.lock().touch.take() else {
            return Ok(());
        };
        let dx = x - start_x;
        let swipe = dx.abs() > s.timings.swipe_threshold_px && at.elapsed() < s.timings.swipe_max;
        if swipe {
            debug!(carousel = %s.id, dx, "carousel_swipe");
            s.inner.lock().state.paused = false;
            if dx < 0.0 {
                self.next()?;
            } else {
                self.prev()?;
            }
            self.resume();
            return Ok(());
        }
        let weak = Arc::downgrade(&self.shared);
        s.timers.schedule(
            s.resume_key.clone(),
            TimerKind::Timeout,
            s.timings.resume_after_touch,
            move || {
                if let Some(shared) = weak.upgrade() {
                    Carousel { shared }.set_paused(false);
                }
                Ok(())
            },
        );
        Ok(())
    }

    /// Re-evaluate the slide set for a viewport `width`. On a change the index
    /// is clamped into the new set and the carousel re-renders.
    pub fn on_viewport_change(&self, width: u32) -> Result<()> {
        let s = &self.shared;
        let set = s
            .slides
            .effective(slide_set_for(width, s.timings.mobile_breakpoint_px));
        {
            let mut inner = s.inner.lock();
            if inner.state.set == set {
                return Ok(());
            }
            inner.state.set = set;
            inner.state.current = clamp(inner.state.current, s.slides.get(set).len());
            debug!(carousel = %s.id, set = %set, index = inner.state.current, "carousel_set_change");
        }
        self.emit_active()?;
        self.resume();
        Ok(())
    }

    /// Page visibility changed: stop while hidden, restart when shown.
    pub fn on_visibility(&self, hidden: bool) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.page_hidden == hidden {
                return;
            }
            inner.page_hidden = hidden;
        }
        if hidden {
            self.shared.timers.cancel(&self.shared.advance_key);
        } else {
            self.resume();
        }
    }

    /// Reduced-motion preference changed.
    pub fn set_reduced_motion(&self, reduce: bool) {
        self.shared.inner.lock().reduced_motion = reduce;
        if reduce {
            self.shared.timers.cancel(&self.shared.advance_key);
        } else {
            self.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tokio::{
        sync::mpsc::{self, UnboundedReceiver},
        time::sleep,
    };

    use super::*;

    fn slides(n: usize, prefix: &str) -> Vec<Slide> {
        (0..n).map(|i| Slide::new(format!("{prefix}{i}"))).collect()
    }

    fn carousel(desktop: usize, mobile: usize) -> (Carousel, UnboundedReceiver<Effect>, TimerRegistry) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = TimerRegistry::new();
        let c = Carousel::new(
            "hero",
            Slides::new(slides(desktop, "d"), slides(mobile, "m")),
            CarouselTimings::default(),
            timers.clone(),
            EffectDispatcher::new(tx),
        );
        (c, rx, timers)
    }

    fn active(rx: &mut UnboundedReceiver<Effect>) -> Vec<(SlideSet, usize)> {
        let mut out = Vec::new();
        while let Ok(e) = rx.try_recv() {
            if let Effect::ActiveSlide { set, index, .. } = e {
                out.push((set, index));
            }
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_navigation_collapses_to_one_transition() {
        let (c, mut rx, _t) = carousel(3, 0);
        assert!(c.next().unwrap());
        assert!(!c.next().unwrap());
        assert!(!c.go_to(2).unwrap());
        assert_eq!(c.current(), 1);
        assert_eq!(active(&mut rx), vec![(SlideSet::Desktop, 1)]);

        sleep(Duration::from_millis(101)).await;
        assert!(c.next().unwrap());
        assert_eq!(c.current(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_wraps_both_ends() {
        let (c, _rx, _t) = carousel(3, 0);
        c.prev().unwrap();
        assert_eq!(c.current(), 2);
        sleep(Duration::from_millis(150)).await;
        c.next().unwrap();
        assert_eq!(c.current(), 0);
        sleep(Duration::from_millis(150)).await;
        c.go_to(7).unwrap();
        assert_eq!(c.current(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_carousel_is_inert() {
        let (c, mut rx, timers) = carousel(0, 0);
        c.render().unwrap();
        assert!(!c.next().unwrap());
        assert!(!c.prev().unwrap());
        c.start();
        assert!(!c.is_running());
        assert_eq!(timers.pending(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn auto_advance_ticks_and_restarts_on_manual_navigation() {
        let (c, mut rx, _t) = carousel(4, 0);
        c.start();
        sleep(Duration::from_millis(5050)).await;
        assert_eq!(c.current(), 1);
        sleep(Duration::from_millis(5000)).await;
        assert_eq!(c.current(), 2);
        active(&mut rx);

        // Manual navigation at t=13s pushes the next tick to 18s.
        sleep(Duration::from_millis(2900)).await;
        assert!(c.manual_prev().unwrap());
        assert_eq!(c.current(), 1);
        sleep(Duration::from_millis(4900)).await;
        assert_eq!(c.current(), 1);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(c.current(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_visible_signal_keeps_the_tick() {
        let (c, _rx, _t) = carousel(3, 0);
        c.start();
        sleep(Duration::from_millis(3000)).await;
        c.on_visibility(false);
        sleep(Duration::from_millis(2050)).await;
        assert_eq!(c.current(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_never_stacks_timers() {
        let (c, _rx, timers) = carousel(5, 0);
        c.start();
        c.start();
        c.start();
        assert_eq!(timers.pending(), 1);
        sleep(Duration::from_millis(5050)).await;
        assert_eq!(c.current(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_hover_pauses() {
        let (c, _rx, _t) = carousel(3, 0);
        c.start();
        c.pointer_enter();
        assert!(!c.is_running());
        sleep(Duration::from_secs(12)).await;
        assert_eq!(c.current(), 0);
        c.pointer_leave();
        assert!(c.is_running());
        sleep(Duration::from_millis(5050)).await;
        assert_eq!(c.current(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn swipes_navigate_and_taps_resume_later() {
        let (c, _rx, _t) = carousel(3, 0);
        c.start();

        c.touch_start(200.0);
        sleep(Duration::from_millis(120)).await;
        c.touch_end(100.0).unwrap();
        assert_eq!(c.current(), 1);
        assert!(c.is_running());

        sleep(Duration::from_millis(200)).await;
        c.touch_start(100.0);
        sleep(Duration::from_millis(120)).await;
        c.touch_end(180.0).unwrap();
        assert_eq!(c.current(), 0);

        // Too short to be a swipe: stays paused for the resume delay.
        sleep(Duration::from_millis(200)).await;
        c.touch_start(100.0);
        c.touch_end(130.0).unwrap();
        assert_eq!(c.current(), 0);
        assert!(!c.is_running());
        sleep(Duration::from_millis(2050)).await;
        assert!(c.is_running());

        // Too slow to be a swipe.
        c.touch_start(300.0);
        sleep(Duration::from_millis(400)).await;
        c.touch_end(0.0).unwrap();
        assert_eq!(c.current(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn viewport_change_clamps_without_reset() {
        let (c, mut rx, _t) = carousel(5, 3);
        c.go_to(1).unwrap();
        sleep(Duration::from_millis(150)).await;
        active(&mut rx);

        c.on_viewport_change(600).unwrap();
        assert_eq!(c.active_set(), SlideSet::Mobile);
        assert_eq!(c.current(), 1);
        assert_eq!(active(&mut rx), vec![(SlideSet::Mobile, 1)]);

        c.on_viewport_change(1200).unwrap();
        c.go_to(4).unwrap();
        sleep(Duration::from_millis(150)).await;
        c.on_viewport_change(768).unwrap();
        assert_eq!(c.current(), 2);

        // Same set: nothing re-rendered.
        active(&mut rx);
        c.on_viewport_change(500).unwrap();
        assert!(active(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_mobile_set_falls_back_to_desktop() {
        let (c, mut rx, _t) = carousel(3, 0);
        c.on_viewport_change(400).unwrap();
        assert_eq!(c.active_set(), SlideSet::Desktop);
        assert!(active(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_page_and_reduced_motion_hold_auto_advance() {
        let (c, _rx, _t) = carousel(3, 0);
        c.set_reduced_motion(true);
        c.start();
        assert!(!c.is_running());
        c.set_reduced_motion(false);
        assert!(c.is_running());

        c.on_visibility(true);
        assert!(!c.is_running());
        sleep(Duration::from_secs(11)).await;
        assert_eq!(c.current(), 0);
        c.on_visibility(false);
        assert!(c.is_running());

        c.stop();
        c.on_visibility(true);
        c.on_visibility(false);
        assert!(!c.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn render_applies_backgrounds_then_active_slide() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let c = Carousel::new(
            "hero",
            Slides::new(
                vec![
                    Slide {
                        element: "s0".into(),
                        background: Some("a.jpg".into()),
                    },
                    Slide::new("s1"),
                ],
                Vec::new(),
            ),
            CarouselTimings::default(),
            TimerRegistry::new(),
            EffectDispatcher::new(tx),
        );
        c.render().unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            Effect::SlideBackground {
                element: "s0".into(),
                url: "a.jpg".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Effect::ActiveSlide {
                carousel: "hero".into(),
                set: SlideSet::Desktop,
                index: 0,
                element: "s0".into()
            }
        );
    }

    proptest! {
        #[test]
        fn wrapped_index_is_in_bounds(index in 0usize..1000, len in 1usize..50) {
            let w = wrap(index, len).unwrap();
            prop_assert!(w < len);
            prop_assert!(clamp(index, len) < len);
        }

        #[test]
        fn next_then_prev_round_trips(current in 0usize..50, len in 1usize..50) {
            let current = current % len;
            let n = next_index(current, len).unwrap();
            prop_assert_eq!(prev_index(n, len), Some(current));
        }

        #[test]
        fn begin_rejects_while_transitioning(a in 0usize..20, b in 0usize..20, len in 1usize..10) {
            let mut state = CarouselState::default();
            let first = state.begin(a, len);
            prop_assert_eq!(first, Some(a % len));
            prop_assert_eq!(state.begin(b, len), None);
            prop_assert_eq!(state.current, a % len);
            state.settle();
            prop_assert_eq!(state.begin(b, len), Some(b % len));
        }
    }

    #[test]
    fn empty_sets_have_no_indices() {
        assert_eq!(wrap(3, 0), None);
        assert_eq!(next_index(0, 0), None);
        assert_eq!(prev_index(0, 0), None);
        assert_eq!(clamp(4, 0), 0);
    }
}
