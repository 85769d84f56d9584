//! Shared protocol types for marquee.
//!
//! The engine owns no DOM. A host page feeds it [`Signal`]s (upstream events)
//! and applies the [`Effect`]s it emits. Elements, overlays, carousels and
//! forms are addressed by stable string ids taken from the page markup.

use std::fmt;

use serde::{Deserialize, Serialize};

mod ids;

pub use ids::{CarouselId, ElementId, FieldName, FormId, OverlayId};

/// Kind of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Modal dialog (enrollment form, course details, demo booking, image gallery).
    #[default]
    Modal,
    /// Non-modal promotional popup.
    Popup,
}

/// Which responsive slide set a carousel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlideSet {
    /// Slides used above the mobile breakpoint.
    #[default]
    Desktop,
    /// Slides used at or below the mobile breakpoint.
    Mobile,
}

impl fmt::Display for SlideSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desktop => f.write_str("desktop"),
            Self::Mobile => f.write_str("mobile"),
        }
    }
}

/// Kind of a form field, mirroring the input `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text (also used for textareas and selects).
    #[default]
    Text,
    /// Email address.
    Email,
    /// Telephone number.
    Tel,
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Escape.
    Escape,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
}

/// A clickable thing on the page, as resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A button that opens an overlay (e.g. "book a demo", "view details").
    OpenOverlay(OverlayId),
    /// An overlay's close button.
    CloseOverlay(OverlayId),
    /// The backdrop area around an overlay's content.
    Backdrop(OverlayId),
    /// A carousel indicator dot.
    Indicator {
        /// Owning carousel.
        carousel: CarouselId,
        /// Slide index the indicator stands for.
        index: usize,
    },
    /// A carousel's "next" button.
    SlideNext(CarouselId),
    /// A carousel's "previous" button.
    SlidePrev(CarouselId),
    /// An "enroll" button carrying its course name.
    Enroll {
        /// Course to prefill into the enrollment form.
        course: String,
    },
    /// A gallery thumbnail.
    GalleryItem {
        /// Full-size image URL.
        src: String,
        /// Caption shown under the image.
        caption: String,
    },
    /// The mobile menu toggle button.
    MenuToggle,
    /// A link inside the navigation menu.
    NavLink,
    /// An in-page anchor link (`href="#section"`).
    Anchor {
        /// Section the link points at.
        element: ElementId,
        /// The section's document offset, as measured by the host.
        offset: u32,
    },
    /// Anywhere outside the navigation menu and its toggle.
    Outside,
    /// The promotional popup's close button.
    PopupClose,
    /// The promotional popup's call-to-action button.
    PopupCta,
    /// The floating back-to-top button.
    BackToTop,
}

/// Upstream events consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// A click on a resolved target.
    Click(Target),
    /// A key press. `scope` is the id of the section containing the focused
    /// element; `target` is the focused element when it is activatable.
    Key {
        /// Key pressed.
        key: Key,
        /// Section scope of the focused element.
        #[serde(default)]
        scope: Option<String>,
        /// Activatable target under focus.
        #[serde(default)]
        target: Option<Target>,
    },
    /// Viewport resized to `width` CSS pixels.
    Resize {
        /// New viewport width.
        width: u32,
    },
    /// Page visibility changed.
    Visibility {
        /// True when the tab was backgrounded.
        hidden: bool,
    },
    /// The reduced-motion media preference changed.
    ReducedMotion {
        /// True when the user prefers reduced motion.
        reduce: bool,
    },
    /// Pointer entered a carousel.
    PointerEnter(CarouselId),
    /// Pointer left a carousel.
    PointerLeave(CarouselId),
    /// Touch started on a carousel.
    TouchStart {
        /// Carousel touched.
        carousel: CarouselId,
        /// Client X of the first touch.
        x: f64,
    },
    /// Touch ended on a carousel.
    TouchEnd {
        /// Carousel touched.
        carousel: CarouselId,
        /// Client X of the changed touch.
        x: f64,
    },
    /// Page scrolled to vertical offset `y`.
    Scroll {
        /// Vertical scroll offset.
        y: f64,
    },
    /// An observed element entered the viewport.
    Intersect {
        /// Element that became visible.
        element: ElementId,
    },
    /// Input focus moved to `element` (or to the document body).
    FocusChanged {
        /// Newly focused element.
        element: Option<ElementId>,
    },
    /// A form field's value changed.
    Input {
        /// Owning form.
        form: FormId,
        /// Field name.
        field: FieldName,
        /// Current raw value.
        value: String,
    },
    /// A form field lost focus.
    Blur {
        /// Owning form.
        form: FormId,
        /// Field name.
        field: FieldName,
    },
    /// A form was submitted.
    Submit {
        /// Submitted form.
        form: FormId,
    },
}

/// Outbound DOM mutations requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Show or hide an overlay (display and `aria-hidden`).
    OverlayVisibility {
        /// Overlay affected.
        overlay: OverlayId,
        /// New visibility.
        visible: bool,
    },
    /// Toggle the body-level scroll lock.
    ScrollLock {
        /// True while any exclusive overlay is open.
        locked: bool,
    },
    /// Move input focus.
    Focus {
        /// Element to focus.
        element: ElementId,
    },
    /// Make exactly one slide and its indicator active.
    ActiveSlide {
        /// Carousel affected.
        carousel: CarouselId,
        /// Slide set the index refers to.
        set: SlideSet,
        /// Active slide index.
        index: usize,
        /// Element of the active slide.
        element: ElementId,
    },
    /// Apply a slide's background image.
    SlideBackground {
        /// Slide element.
        element: ElementId,
        /// Image URL.
        url: String,
    },
    /// Show a field's validation message, or clear it with `None`.
    FieldError {
        /// Owning form.
        form: FormId,
        /// Field name.
        field: FieldName,
        /// Message to render.
        message: Option<String>,
    },
    /// Write a value into a field.
    FieldValue {
        /// Owning form.
        form: FormId,
        /// Field name.
        field: FieldName,
        /// Value to write.
        value: String,
    },
    /// Reset a form to its initial state.
    FormReset {
        /// Form to reset.
        form: FormId,
    },
    /// A validated form was handed to the submission collaborator.
    Submitted {
        /// Submitted form.
        form: FormId,
        /// Trimmed field values in declaration order.
        values: Vec<(FieldName, String)>,
    },
    /// Set the gallery overlay's image and caption.
    GalleryImage {
        /// Image URL.
        src: String,
        /// Caption text.
        caption: String,
    },
    /// Expand or collapse the mobile menu (`aria-expanded`).
    MenuExpanded {
        /// New state.
        expanded: bool,
    },
    /// Hide or show the navigation bar.
    NavbarHidden {
        /// True when hidden.
        hidden: bool,
    },
    /// Show or hide the back-to-top button.
    BackToTopVisible {
        /// New visibility.
        visible: bool,
    },
    /// Scroll the window smoothly to `y`.
    ScrollTo {
        /// Target offset.
        y: u32,
    },
    /// Mark an element as revealed (scroll-triggered entrance).
    Reveal {
        /// Element revealed.
        element: ElementId,
    },
    /// Display or hide an element outright (`display: none`).
    Displayed {
        /// Element affected.
        element: ElementId,
        /// True to display it.
        displayed: bool,
    },
    /// Pause or resume decorative animations.
    AnimationsPaused {
        /// True while the page is hidden.
        paused: bool,
    },
    /// A log line forwarded to the host console.
    Log {
        /// Level name.
        level: String,
        /// Event target.
        target: String,
        /// Rendered message.
        message: String,
    },
}
