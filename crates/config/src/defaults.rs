// Defaults for the named site options

pub(crate) const AUTO_ADVANCE_MS: u64 = 5_000;
pub(crate) const TRANSITION_SETTLE_MS: u64 = 100;
pub(crate) const POPUP_INITIAL_DELAY_MS: u64 = 15_000;
pub(crate) const POPUP_REPEAT_MS: u64 = 25_000;
pub(crate) const POPUP_AUTO_HIDE_MS: u64 = 8_000;
pub(crate) const POPUP_COOLDOWN_MS: u64 = 120_000;
pub(crate) const SWIPE_THRESHOLD_PX: u32 = 50;
pub(crate) const SWIPE_MAX_MS: u64 = 300;
pub(crate) const MOBILE_BREAKPOINT_PX: u32 = 768;

// Page chrome and input pacing
pub(crate) const RESUME_AFTER_TOUCH_MS: u64 = 2_000;
pub(crate) const RESIZE_DEBOUNCE_MS: u64 = 250;
pub(crate) const SCROLL_THROTTLE_MS: u64 = 100;
pub(crate) const BACK_TO_TOP_OFFSET_PX: u32 = 300;
pub(crate) const NAVBAR_HIDE_OFFSET_PX: u32 = 100;
pub(crate) const NAVBAR_HEIGHT_PX: u32 = 70;
pub(crate) const ANCHOR_MARGIN_PX: u32 = 20;

// Serde default functions
pub(crate) const fn default_true() -> bool {
    true
}
