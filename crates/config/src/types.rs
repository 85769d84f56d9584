use std::time::Duration;

use marquee_protocol::{
    CarouselId, ElementId, FieldKind, FieldName, FormId, OverlayId, OverlayKind, SlideSet,
};
use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Named timing and layout options shared by every component.
///
/// Field names are camelCase in configuration files (`autoAdvanceMs`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Options {
    /// Carousel auto-advance period.
    pub auto_advance_ms: u64,
    /// Window after a slide change during which navigation is ignored.
    pub transition_settle_ms: u64,
    /// Delay before the popup first appears.
    pub popup_initial_delay_ms: u64,
    /// Period of later popup appearances.
    pub popup_repeat_ms: u64,
    /// How long the popup stays up on its own.
    pub popup_auto_hide_ms: u64,
    /// Suppression after the user dismisses the popup.
    pub popup_cooldown_ms: u64,
    /// Minimum horizontal travel for a swipe.
    pub swipe_threshold_px: u32,
    /// Maximum duration of a swipe.
    pub swipe_max_ms: u64,
    /// Viewports at or below this width use mobile slide sets.
    pub mobile_breakpoint_px: u32,
    /// Idle time after a non-swipe touch before auto-advance resumes.
    pub resume_after_touch_ms: u64,
    /// Debounce applied to viewport resizes.
    pub resize_debounce_ms: u64,
    /// Throttle applied to scroll handling.
    pub scroll_throttle_ms: u64,
    /// Scroll offset past which the back-to-top button shows.
    pub back_to_top_offset_px: u32,
    /// Scroll offset past which scrolling down hides the navbar.
    pub navbar_hide_offset_px: u32,
    /// Height of the fixed navbar, subtracted from anchor scroll targets.
    pub navbar_height_px: u32,
    /// Extra gap left above a section scrolled to from an anchor link.
    pub anchor_margin_px: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            auto_advance_ms: AUTO_ADVANCE_MS,
            transition_settle_ms: TRANSITION_SETTLE_MS,
            popup_initial_delay_ms: POPUP_INITIAL_DELAY_MS,
            popup_repeat_ms: POPUP_REPEAT_MS,
            popup_auto_hide_ms: POPUP_AUTO_HIDE_MS,
            popup_cooldown_ms: POPUP_COOLDOWN_MS,
            swipe_threshold_px: SWIPE_THRESHOLD_PX,
            swipe_max_ms: SWIPE_MAX_MS,
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            resume_after_touch_ms: RESUME_AFTER_TOUCH_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            scroll_throttle_ms: SCROLL_THROTTLE_MS,
            back_to_top_offset_px: BACK_TO_TOP_OFFSET_PX,
            navbar_hide_offset_px: NAVBAR_HIDE_OFFSET_PX,
            navbar_height_px: NAVBAR_HEIGHT_PX,
            anchor_margin_px: ANCHOR_MARGIN_PX,
        }
    }
}

impl Options {
    /// Iterate over every duration option with its configuration name.
    pub(crate) fn durations(&self) -> [(&'static str, u64); 10] {
        [
            ("autoAdvanceMs", self.auto_advance_ms),
            ("transitionSettleMs", self.transition_settle_ms),
            ("popupInitialDelayMs", self.popup_initial_delay_ms),
            ("popupRepeatMs", self.popup_repeat_ms),
            ("popupAutoHideMs", self.popup_auto_hide_ms),
            ("popupCooldownMs", self.popup_cooldown_ms),
            ("swipeMaxMs", self.swipe_max_ms),
            ("resumeAfterTouchMs", self.resume_after_touch_ms),
            ("resizeDebounceMs", self.resize_debounce_ms),
            ("scrollThrottleMs", self.scroll_throttle_ms),
        ]
    }

    /// Carousel auto-advance period.
    pub fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }
    /// Settle window after a slide change.
    pub fn transition_settle(&self) -> Duration {
        Duration::from_millis(self.transition_settle_ms)
    }
    /// Delay before the first popup.
    pub fn popup_initial_delay(&self) -> Duration {
        Duration::from_millis(self.popup_initial_delay_ms)
    }
    /// Period between popup appearances.
    pub fn popup_repeat(&self) -> Duration {
        Duration::from_millis(self.popup_repeat_ms)
    }
    /// How long a popup stays up on its own.
    pub fn popup_auto_hide(&self) -> Duration {
        Duration::from_millis(self.popup_auto_hide_ms)
    }
    /// Suppression window after a dismissal.
    pub fn popup_cooldown(&self) -> Duration {
        Duration::from_millis(self.popup_cooldown_ms)
    }
    /// Longest touch still counted as a swipe.
    pub fn swipe_max(&self) -> Duration {
        Duration::from_millis(self.swipe_max_ms)
    }
    /// Idle time before auto-advance resumes after a tap.
    pub fn resume_after_touch(&self) -> Duration {
        Duration::from_millis(self.resume_after_touch_ms)
    }
    /// Quiet period before a resize is acted on.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
    /// Minimum spacing of scroll handling.
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// Slide set in effect for a viewport of `width` pixels.
    pub fn slide_set_for(&self, width: u32) -> SlideSet {
        slide_set_for(width, self.mobile_breakpoint_px)
    }
}

/// Layout in effect for a viewport of `width` pixels: widths at or below
/// `breakpoint_px` are mobile.
pub fn slide_set_for(width: u32, breakpoint_px: u32) -> SlideSet {
    if width <= breakpoint_px {
        SlideSet::Mobile
    } else {
        SlideSet::Desktop
    }
}

/// An overlay declared by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlaySpec {
    /// Overlay element id.
    pub id: OverlayId,
    /// Modal or popup.
    #[serde(default)]
    pub kind: OverlayKind,
    /// Defaults to true for modals and false for popups.
    #[serde(default)]
    pub exclusive: Option<bool>,
    /// First focusable element inside the overlay.
    #[serde(default)]
    pub focus: Option<ElementId>,
    /// Whether clicking the backdrop closes the overlay.
    #[serde(default = "default_true")]
    pub backdrop_closes: bool,
}

impl OverlaySpec {
    /// Effective exclusivity after applying the per-kind default.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
            .unwrap_or(matches!(self.kind, OverlayKind::Modal))
    }
}

/// One slide of a carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideSpec {
    /// Slide element id.
    pub element: ElementId,
    /// Background image URL applied on start.
    #[serde(default)]
    pub background: Option<String>,
}

/// A carousel (header slideshow, testimonial slider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarouselSpec {
    /// Carousel id.
    pub id: CarouselId,
    /// Slides shown above the mobile breakpoint.
    pub slides: Vec<SlideSpec>,
    /// Alternate slides shown at or below the mobile breakpoint. Empty means
    /// the desktop slides are used everywhere.
    #[serde(default)]
    pub mobile_slides: Vec<SlideSpec>,
    /// Section scope that must contain focus for arrow keys to apply.
    /// `None` makes the carousel respond to arrow keys page-wide.
    #[serde(default)]
    pub key_scope: Option<String>,
    /// Per-carousel override of `autoAdvanceMs`.
    #[serde(default)]
    pub auto_advance_ms: Option<u64>,
}

/// A field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Field name, unique within its form.
    pub name: FieldName,
    /// Input element id, focused when the field blocks a submission.
    pub element: ElementId,
    /// Input type driving format checks.
    #[serde(default)]
    pub kind: FieldKind,
    /// Whether an empty value is an error.
    #[serde(default)]
    pub required: bool,
}

/// A form (enrollment, demo booking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSpec {
    /// Form id.
    pub id: FormId,
    /// Overlay closed after a successful submission.
    #[serde(default)]
    pub overlay: Option<OverlayId>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

/// The recurring promotional popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopupSpec {
    /// Non-exclusive overlay the popup shows.
    pub overlay: OverlayId,
}

/// Wiring for "enroll" buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrollmentSpec {
    /// Modal holding the enrollment form.
    pub overlay: OverlayId,
    /// Enrollment form.
    pub form: FormId,
    /// Field receiving the course name.
    pub course_field: FieldName,
}

/// Hero background images, one per layout. Exactly one is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroSpec {
    /// Image shown above the mobile breakpoint.
    pub desktop: ElementId,
    /// Image shown at or below the mobile breakpoint.
    pub mobile: ElementId,
}

/// Complete site configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Timing and layout options.
    pub options: Options,
    /// Every overlay on the page.
    pub overlays: Vec<OverlaySpec>,
    /// Every carousel on the page.
    pub carousels: Vec<CarouselSpec>,
    /// Every validated form on the page.
    pub forms: Vec<FormSpec>,
    /// The promotional popup, if the page has one.
    pub popup: Option<PopupSpec>,
    /// Enroll-button wiring.
    pub enrollment: Option<EnrollmentSpec>,
    /// Modal used to show gallery images.
    pub gallery: Option<OverlayId>,
    /// Hero background pair swapped at the mobile breakpoint.
    pub hero: Option<HeroSpec>,
}

impl Config {
    /// Look up an overlay declaration.
    pub fn overlay(&self, id: &OverlayId) -> Option<&OverlaySpec> {
        self.overlays.iter().find(|o| &o.id == id)
    }

    /// Look up a form declaration.
    pub fn form(&self, id: &FormId) -> Option<&FormSpec> {
        self.forms.iter().find(|f| &f.id == id)
    }
}
