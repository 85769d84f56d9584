//! Marquee Engine
//!
//! Headless coordination for the interactive parts of a course-enrollment
//! site. The host page feeds [`Signal`]s in and applies the [`Effect`]s that
//! come out of its effect channel; the engine owns no DOM.
//!
//! - [`TimerRegistry`]: keyed timers, at most one pending callback per key
//! - [`OverlayManager`]: modal/popup visibility, scroll lock and focus
//! - [`Carousel`]: slide rotation with swipe, hover and visibility pauses
//! - [`Popup`]: the promotional popup's show/hide/cooldown cycle
//! - [`Forms`] and [`validate`]: field validation and submission
//! - [`Chrome`]: menu, scroll-driven navbar, anchor scrolling, hero swap,
//!   reveal-on-scroll
//!
//! [`Site`] wires them together from a [`config::Config`] and routes signals.
use std::sync::Arc;

mod carousel;
mod chrome;
mod effects;
mod error;
mod form;
mod overlay;
mod page;
mod popup;
mod submit;
mod timers;

use config::{Config, EnrollmentSpec, Options};
use marquee_protocol::{CarouselId, Effect, Key, OverlayId, Signal, Target};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};

pub use carousel::{
    Carousel, CarouselState, CarouselTimings, Slide, Slides, clamp, next_index, prev_index, wrap,
};
pub use chrome::{Chrome, ChromeTimings};
pub use effects::EffectDispatcher;
pub use error::{Error, Result};
pub use form::{
    Field, FieldValidationResult, Forms, INVALID_EMAIL, INVALID_PHONE, REQUIRED, SubmitOutcome,
    validate,
};
pub use overlay::{Overlay, OverlayHook, OverlayManager, OverlayObserver};
pub use popup::{Popup, PopupPhase, PopupState, PopupTimings};
pub use submit::{EffectSubmitter, RecordingSubmitter, Submission, Submitter};
pub use timers::{TimerKind, TimerRegistry};

/// Timer key for the viewport resize debounce.
const RESIZE_KEY: &str = "viewport:resize";

/// One page's worth of coordinated components.
///
/// Construct with [`Site::new`], call [`Site::start`] once the page is ready,
/// then feed every upstream event to [`Site::dispatch`].
#[derive(Clone)]
pub struct Site {
    /// Named timings.
    options: Options,
    /// Shared timer registry.
    timers: TimerRegistry,
    /// Outbound effects.
    effects: EffectDispatcher,
    /// Overlay visibility, scroll lock, focus.
    overlays: OverlayManager,
    /// Carousels in configuration order.
    carousels: Vec<Carousel>,
    /// Form controller.
    forms: Forms,
    /// Promotional popup, when configured.
    popup: Option<Popup>,
    /// Menu, navbar, back-to-top, reveal.
    chrome: Chrome,
    /// Enroll-button wiring.
    enrollment: Option<EnrollmentSpec>,
    /// Overlay showing gallery images.
    gallery: Option<OverlayId>,
}

impl Site {
    /// Build a site whose submissions become `Submitted` effects.
    pub fn new(config: &Config, tx: UnboundedSender<Effect>) -> Result<Self> {
        let submitter = Arc::new(EffectSubmitter::new(EffectDispatcher::new(tx.clone())));
        Self::with_submitter(config, tx, submitter)
    }

    /// Build a site with a custom submission collaborator.
    ///
    /// Fails with [`Error::DuplicateOverlay`] when two overlays share an id.
    pub fn with_submitter(
        config: &Config,
        tx: UnboundedSender<Effect>,
        submitter: Arc<dyn Submitter>,
    ) -> Result<Self> {
        let options = config.options;
        let effects = EffectDispatcher::new(tx);
        let timers = TimerRegistry::new();
        let overlays = OverlayManager::new(effects.clone());

        let forms = Forms::new(overlays.clone(), effects.clone(), submitter);
        for spec in &config.forms {
            forms.add(spec);
        }

        for spec in &config.overlays {
            let mut overlay = Overlay::from_spec(spec);
            let owned = forms.owned_by(&spec.id);
            if !owned.is_empty() {
                overlay = overlay.on_close(forms.reset_on_close(owned));
            }
            overlays.register(overlay)?;
        }

        let carousels = config
            .carousels
            .iter()
            .map(|spec| Carousel::from_spec(spec, &options, timers.clone(), effects.clone()))
            .collect();

        let popup = config.popup.as_ref().map(|p| {
            Popup::new(
                p.overlay.clone(),
                PopupTimings::from(&options),
                overlays.clone(),
                timers.clone(),
            )
        });

        let chrome = Chrome::new(ChromeTimings::from(&options), timers.clone(), effects.clone());
        if let Some(hero) = &config.hero {
            chrome.set_hero(hero.clone());
        }

        debug!(
            overlays = config.overlays.len(),
            carousels = config.carousels.len(),
            forms = config.forms.len(),
            popup = popup.is_some(),
            "site_built"
        );
        Ok(Self {
            options,
            timers,
            effects,
            overlays,
            carousels,
            forms,
            popup,
            chrome,
            enrollment: config.enrollment.clone(),
            gallery: config.gallery.clone(),
        })
    }

    /// Render carousels and start every timer-driven component.
    pub fn start(&self) -> Result<()> {
        for carousel in &self.carousels {
            carousel.render()?;
            carousel.start();
        }
        if let Some(popup) = &self.popup {
            popup.start();
        }
        debug!("site_started");
        Ok(())
    }

    /// Cancel all timers and close every overlay.
    pub fn shutdown(&self) -> Result<()> {
        self.timers.cancel_all();
        self.overlays.close_all()?;
        debug!("site_shutdown");
        Ok(())
    }

    /// Route one upstream signal.
    ///
    /// Signals naming unknown carousels, forms or overlays are logged and
    /// ignored; only a closed effect channel or a failed submission surface.
    pub fn dispatch(&self, signal: Signal) -> Result<()> {
        trace!(signal = ?signal, "dispatch");
        match self.route(signal) {
            Err(e) if e.is_missing_target() => {
                warn!(error = %e, "dispatch_missing_target");
                Ok(())
            }
            other => other,
        }
    }

    fn route(&self, signal: Signal) -> Result<()> {
        match signal {
            Signal::Click(target) => self.click(target),
            Signal::Key { key, scope, target } => self.key(key, scope.as_deref(), target),
            Signal::Resize { width } => {
                self.on_resize(width);
                Ok(())
            }
            Signal::Visibility { hidden } => {
                for c in &self.carousels {
                    c.on_visibility(hidden);
                }
                if let Some(popup) = &self.popup {
                    popup.on_visibility(hidden);
                }
                self.chrome.on_visibility(hidden)
            }
            Signal::ReducedMotion { reduce } => {
                for c in &self.carousels {
                    c.set_reduced_motion(reduce);
                }
                Ok(())
            }
            Signal::PointerEnter(id) => {
                self.carousel_or_err(&id)?.pointer_enter();
                Ok(())
            }
            Signal::PointerLeave(id) => {
                self.carousel_or_err(&id)?.pointer_leave();
                Ok(())
            }
            Signal::TouchStart { carousel, x } => {
                self.carousel_or_err(&carousel)?.touch_start(x);
                Ok(())
            }
            Signal::TouchEnd { carousel, x } => self.carousel_or_err(&carousel)?.touch_end(x),
            Signal::Scroll { y } => self.chrome.on_scroll(y),
            Signal::Intersect { element } => self.chrome.reveal(&element),
            Signal::FocusChanged { element } => {
                self.overlays.note_focus(element);
                Ok(())
            }
            Signal::Input { form, field, value } => self.forms.input(&form, &field, &value),
            Signal::Blur { form, field } => self.forms.blur(&form, &field).map(|_| ()),
            Signal::Submit { form } => {
                let outcome = self.forms.submit(&form)?;
                debug!(form = %form, outcome = ?outcome, "submit");
                Ok(())
            }
        }
    }

    fn key(&self, key: Key, scope: Option<&str>, target: Option<Target>) -> Result<()> {
        match key {
            Key::Escape => match self.overlays.current_exclusive() {
                Some(id) => self.overlays.close(&id),
                None => self.chrome.close_menu().map(|_| ()),
            },
            Key::ArrowLeft | Key::ArrowRight => {
                if let Some(open) = self.overlays.current_exclusive() {
                    trace!(overlay = %open, "arrow_ignored_modal_open");
                    return Ok(());
                }
                for c in self.carousels.iter().filter(|c| c.accepts_keys_from(scope)) {
                    if key == Key::ArrowLeft {
                        c.manual_prev()?;
                    } else {
                        c.manual_next()?;
                    }
                }
                Ok(())
            }
            Key::Enter | Key::Space => match target {
                Some(target) => self.click(target),
                None => Ok(()),
            },
        }
    }

    fn click(&self, target: Target) -> Result<()> {
        match target {
            Target::OpenOverlay(id) => self.overlays.open(&id),
            Target::CloseOverlay(id) => self.close_overlay(&id),
            Target::Backdrop(id) => {
                if !self.overlays.contains(&id) {
                    return Err(Error::UnknownOverlay(id));
                }
                if self.overlays.closes_on_backdrop(&id) {
                    self.close_overlay(&id)
                } else {
                    Ok(())
                }
            }
            Target::Indicator { carousel, index } => self
                .carousel_or_err(&carousel)?
                .manual_go_to(index)
                .map(|_| ()),
            Target::SlideNext(id) => self.carousel_or_err(&id)?.manual_next().map(|_| ()),
            Target::SlidePrev(id) => self.carousel_or_err(&id)?.manual_prev().map(|_| ()),
            Target::Enroll { course } => {
                let Some(enroll) = &self.enrollment else {
                    warn!(course = %course, "enroll_not_configured");
                    return Ok(());
                };
                self.forms
                    .prefill(&enroll.form, &enroll.course_field, &course)?;
                self.overlays.open(&enroll.overlay)
            }
            Target::GalleryItem { src, caption } => {
                let Some(gallery) = &self.gallery else {
                    warn!(src = %src, "gallery_not_configured");
                    return Ok(());
                };
                self.effects.emit(Effect::GalleryImage { src, caption })?;
                self.overlays.open(gallery)
            }
            Target::MenuToggle => self.chrome.toggle_menu(),
            Target::NavLink | Target::Outside => self.chrome.close_menu().map(|_| ()),
            Target::Anchor { element, offset } => {
                self.chrome.close_menu()?;
                self.chrome.scroll_to_anchor(offset)?;
                self.overlays.focus(&element)
            }
            Target::PopupClose => match &self.popup {
                Some(popup) => popup.dismiss(),
                None => Ok(()),
            },
            Target::PopupCta => match &self.popup {
                Some(popup) => popup.engage(),
                None => Ok(()),
            },
            Target::BackToTop => self.chrome.back_to_top(),
        }
    }

    /// Close `id`; closing the popup's overlay counts as a dismiss.
    fn close_overlay(&self, id: &OverlayId) -> Result<()> {
        match &self.popup {
            Some(popup) if popup.overlay() == id => popup.dismiss(),
            _ => self.overlays.close(id),
        }
    }

    fn on_resize(&self, width: u32) {
        let carousels = self.carousels.clone();
        let chrome = self.chrome.clone();
        self.timers.schedule(
            RESIZE_KEY,
            TimerKind::Timeout,
            self.options.resize_debounce(),
            move || {
                trace!(width, "viewport_change");
                chrome.on_viewport_change(width)?;
                carousels
                    .iter()
                    .try_for_each(|c| c.on_viewport_change(width))
            },
        );
    }

    fn carousel_or_err(&self, id: &CarouselId) -> Result<&Carousel> {
        self.carousel(id)
            .ok_or_else(|| Error::UnknownCarousel(id.clone()))
    }

    /// Carousel by id.
    pub fn carousel(&self, id: &CarouselId) -> Option<&Carousel> {
        self.carousels.iter().find(|c| c.id() == id)
    }

    /// All carousels, in configuration order.
    pub fn carousels(&self) -> &[Carousel] {
        &self.carousels
    }

    /// The overlay manager.
    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    /// The form controller.
    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    /// The popup scheduler, when configured.
    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Page chrome.
    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    /// The shared timer registry.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Options the site was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }
}
