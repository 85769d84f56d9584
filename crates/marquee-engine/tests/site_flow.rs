use std::{sync::Arc, time::Duration};

use config::Config;
use marquee_engine::{Error, INVALID_EMAIL, REQUIRED, RecordingSubmitter, Site};
use marquee_protocol::{Effect, Key, OverlayId, Signal, SlideSet, Target};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time::{Instant, sleep, sleep_until},
};

const SITE: &str = r#"(
    overlays: [
        (id: "enrollmentModal", focus: Some("enroll-name")),
        (id: "courseModal", focus: Some("course-close")),
        (id: "galleryModal"),
        (id: "counsellingPopup", kind: popup),
    ],
    carousels: [
        (
            id: "header",
            slides: [
                (element: "slide-1", background: Some("/img/1.jpg")),
                (element: "slide-2", background: Some("/img/2.jpg")),
                (element: "slide-3"),
            ],
            mobile_slides: [(element: "slide-m1"), (element: "slide-m2")],
        ),
        (id: "testimonials", slides: [(element: "t1"), (element: "t2")], key_scope: Some("testimonials")),
    ],
    forms: [
        (
            id: "enrollmentForm",
            overlay: Some("enrollmentModal"),
            fields: [
                (name: "name", element: "enroll-name", required: true),
                (name: "email", element: "enroll-email", kind: email, required: true),
                (name: "phone", element: "enroll-phone", kind: tel),
                (name: "course", element: "enroll-course"),
            ],
        ),
    ],
    popup: Some((overlay: "counsellingPopup")),
    enrollment: Some((overlay: "enrollmentModal", form: "enrollmentForm", course_field: "course")),
    gallery: Some("galleryModal"),
    hero: Some((desktop: "hero-desktop", mobile: "hero-mobile")),
)"#;

fn site() -> (Site, UnboundedReceiver<Effect>) {
    let cfg = Config::from_ron(SITE).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (Site::new(&cfg, tx).unwrap(), rx)
}

fn drain(rx: &mut UnboundedReceiver<Effect>) -> Vec<Effect> {
    let mut out = Vec::new();
    while let Ok(e) = rx.try_recv() {
        out.push(e);
    }
    out
}

fn click(target: Target) -> Signal {
    Signal::Click(target)
}

fn key(key: Key, scope: Option<&str>) -> Signal {
    Signal::Key {
        key,
        scope: scope.map(str::to_string),
        target: None,
    }
}

fn visible(overlay: &str, visible: bool) -> Effect {
    Effect::OverlayVisibility {
        overlay: overlay.into(),
        visible,
    }
}

fn oid(s: &str) -> OverlayId {
    OverlayId::from(s)
}

#[tokio::test(start_paused = true)]
async fn start_renders_backgrounds_and_first_slides() {
    let (site, mut rx) = site();
    site.start().unwrap();
    let effects = drain(&mut rx);
    assert_eq!(
        &effects[..3],
        &[
            Effect::SlideBackground {
                element: "slide-1".into(),
                url: "/img/1.jpg".into()
            },
            Effect::SlideBackground {
                element: "slide-2".into(),
                url: "/img/2.jpg".into()
            },
            Effect::ActiveSlide {
                carousel: "header".into(),
                set: SlideSet::Desktop,
                index: 0,
                element: "slide-1".into()
            },
        ]
    );
    assert!(site.carousels().iter().all(|c| c.is_running()));
}

#[tokio::test(start_paused = true)]
async fn enrolling_from_course_details_swaps_modals_without_unlocking() {
    let (site, mut rx) = site();
    site.dispatch(Signal::FocusChanged {
        element: Some("details-btn".into()),
    })
    .unwrap();
    site.dispatch(click(Target::OpenOverlay(oid("courseModal"))))
        .unwrap();
    drain(&mut rx);

    site.dispatch(click(Target::Enroll {
        course: "Data Science".into(),
    }))
    .unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![
            Effect::FieldValue {
                form: "enrollmentForm".into(),
                field: "course".into(),
                value: "Data Science".into()
            },
            visible("courseModal", false),
            visible("enrollmentModal", true),
            Effect::Focus {
                element: "enroll-name".into()
            },
        ]
    );
    assert_eq!(site.overlays().current_exclusive(), Some(oid("enrollmentModal")));
    assert!(site.overlays().scroll_locked());

    // Escape closes the modal, unlocks, restores focus and resets its form.
    site.dispatch(key(Key::Escape, None)).unwrap();
    let effects = drain(&mut rx);
    assert_eq!(
        effects,
        vec![
            visible("enrollmentModal", false),
            Effect::ScrollLock { locked: false },
            Effect::Focus {
                element: "details-btn".into()
            },
            Effect::FormReset {
                form: "enrollmentForm".into()
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn enrollment_submission_flow() {
    let recorder = RecordingSubmitter::new();
    let cfg = Config::from_ron(SITE).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let site = Site::with_submitter(&cfg, tx, Arc::new(recorder.clone())).unwrap();
    let form = "enrollmentForm";

    site.dispatch(click(Target::Enroll {
        course: "Web Development".into(),
    }))
    .unwrap();
    site.dispatch(Signal::Input {
        form: form.into(),
        field: "email".into(),
        value: "ada@".into(),
    })
    .unwrap();
    drain(&mut rx);

    site.dispatch(Signal::Submit { form: form.into() }).unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![
            Effect::FieldError {
                form: form.into(),
                field: "name".into(),
                message: Some(REQUIRED.into())
            },
            Effect::FieldError {
                form: form.into(),
                field: "email".into(),
                message: Some(INVALID_EMAIL.into())
            },
            Effect::Focus {
                element: "enroll-name".into()
            },
        ]
    );

    for (field, value) in [("name", "Ada Lovelace"), ("email", "ada@example.org"), ("phone", "+1 (555) 010-9999")] {
        site.dispatch(Signal::Input {
            form: form.into(),
            field: field.into(),
            value: value.into(),
        })
        .unwrap();
    }
    site.dispatch(Signal::Submit { form: form.into() }).unwrap();
    let subs = recorder.submissions();
    assert_eq!(subs.len(), 1);
    assert!(subs[0]
        .values
        .contains(&("course".into(), "Web Development".to_string())));
    let effects = drain(&mut rx);
    assert!(effects.contains(&Effect::FormReset { form: form.into() }));
    assert!(effects.contains(&Effect::ScrollLock { locked: false }));
    assert!(!site.overlays().is_open(&oid("enrollmentModal")));
}

#[tokio::test(start_paused = true)]
async fn default_submitter_emits_submitted_effect() {
    let (site, mut rx) = site();
    for (field, value) in [("name", "Ada"), ("email", "ada@example.org")] {
        site.dispatch(Signal::Input {
            form: "enrollmentForm".into(),
            field: field.into(),
            value: value.into(),
        })
        .unwrap();
    }
    site.dispatch(Signal::Submit {
        form: "enrollmentForm".into(),
    })
    .unwrap();
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, Effect::Submitted { form, .. } if form.as_str() == "enrollmentForm")));
}

#[tokio::test(start_paused = true)]
async fn popup_yields_to_modals() {
    let (site, _rx) = site();
    let popup = site.popup().unwrap().clone();
    let t0 = Instant::now();
    site.start().unwrap();

    sleep_until(t0 + Duration::from_secs(10)).await;
    site.dispatch(click(Target::OpenOverlay(oid("courseModal"))))
        .unwrap();
    sleep_until(t0 + Duration::from_millis(15_100)).await;
    assert!(!popup.is_visible());

    site.dispatch(key(Key::Escape, None)).unwrap();
    sleep_until(t0 + Duration::from_millis(40_100)).await;
    assert!(popup.is_visible());

    // A modal opening while the popup shows hides it in the same call.
    site.dispatch(click(Target::OpenOverlay(oid("galleryModal"))))
        .unwrap();
    assert!(!popup.is_visible());
    assert!(!site.overlays().is_open(&oid("counsellingPopup")));
}

#[tokio::test(start_paused = true)]
async fn popup_close_button_starts_cooldown_and_cta_stops_it() {
    let (site, _rx) = site();
    let popup = site.popup().unwrap().clone();
    let t0 = Instant::now();
    site.start().unwrap();
    sleep_until(t0 + Duration::from_secs(16)).await;
    assert!(popup.is_visible());
    site.dispatch(click(Target::CloseOverlay(oid("counsellingPopup"))))
        .unwrap();
    assert!(popup.state().dismissed_until.is_some());

    sleep_until(t0 + Duration::from_millis(140_100)).await;
    assert!(popup.is_visible());
    site.dispatch(click(Target::PopupCta)).unwrap();
    sleep_until(t0 + Duration::from_secs(400)).await;
    assert!(!popup.is_visible());
}

#[tokio::test(start_paused = true)]
async fn rapid_clicks_drop_stale_input() {
    let (site, mut rx) = site();
    for _ in 0..3 {
        site.dispatch(click(Target::SlideNext("header".into())))
            .unwrap();
    }
    let slides: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, Effect::ActiveSlide { .. }))
        .collect();
    assert_eq!(slides.len(), 1);
    assert_eq!(site.carousel(&"header".into()).unwrap().current(), 1);
}

#[tokio::test(start_paused = true)]
async fn arrow_keys_respect_modals_and_scopes() {
    let (site, _rx) = site();
    let header = site.carousel(&"header".into()).unwrap().clone();
    let testimonials = site.carousel(&"testimonials".into()).unwrap().clone();

    site.dispatch(key(Key::ArrowRight, None)).unwrap();
    assert_eq!(header.current(), 1);
    assert_eq!(testimonials.current(), 0);

    sleep(Duration::from_millis(150)).await;
    site.dispatch(key(Key::ArrowLeft, Some("testimonials")))
        .unwrap();
    assert_eq!(header.current(), 0);
    assert_eq!(testimonials.current(), 1);

    sleep(Duration::from_millis(150)).await;
    site.dispatch(click(Target::OpenOverlay(oid("courseModal"))))
        .unwrap();
    site.dispatch(key(Key::ArrowRight, None)).unwrap();
    assert_eq!(header.current(), 0);
}

#[tokio::test(start_paused = true)]
async fn enter_activates_the_focused_target() {
    let (site, _rx) = site();
    site.dispatch(Signal::Key {
        key: Key::Enter,
        scope: None,
        target: Some(Target::OpenOverlay(oid("courseModal"))),
    })
    .unwrap();
    assert!(site.overlays().is_open(&oid("courseModal")));
    site.dispatch(click(Target::Backdrop(oid("courseModal"))))
        .unwrap();
    assert!(!site.overlays().is_open(&oid("courseModal")));
}

#[tokio::test(start_paused = true)]
async fn resize_is_debounced_and_keeps_position() {
    let (site, mut rx) = site();
    let header = site.carousel(&"header".into()).unwrap().clone();
    header.go_to(1).unwrap();
    sleep(Duration::from_millis(150)).await;
    drain(&mut rx);

    site.dispatch(Signal::Resize { width: 700 }).unwrap();
    sleep(Duration::from_millis(100)).await;
    site.dispatch(Signal::Resize { width: 600 }).unwrap();
    sleep(Duration::from_millis(200)).await;
    assert!(drain(&mut rx).is_empty());
    sleep(Duration::from_millis(100)).await;
    assert_eq!(
        drain(&mut rx),
        vec![
            Effect::Displayed {
                element: "hero-desktop".into(),
                displayed: false
            },
            Effect::Displayed {
                element: "hero-mobile".into(),
                displayed: true
            },
            Effect::ActiveSlide {
                carousel: "header".into(),
                set: SlideSet::Mobile,
                index: 1,
                element: "slide-m2".into()
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn hidden_page_pauses_everything() {
    let (site, mut rx) = site();
    site.start().unwrap();
    drain(&mut rx);
    site.dispatch(Signal::Visibility { hidden: true }).unwrap();
    assert_eq!(drain(&mut rx), vec![Effect::AnimationsPaused { paused: true }]);
    assert!(site.carousels().iter().all(|c| !c.is_running()));
    assert_eq!(site.timers().pending(), 0);

    site.dispatch(Signal::Visibility { hidden: false }).unwrap();
    assert!(site.carousels().iter().all(|c| c.is_running()));
    assert!(site.timers().is_active("popup:cycle"));
}

#[tokio::test(start_paused = true)]
async fn unknown_targets_are_ignored() {
    let (site, mut rx) = site();
    site.dispatch(Signal::PointerEnter("ghost".into())).unwrap();
    site.dispatch(click(Target::SlideNext("ghost".into())))
        .unwrap();
    site.dispatch(click(Target::Backdrop(oid("ghost")))).unwrap();
    site.dispatch(click(Target::OpenOverlay(oid("ghost"))))
        .unwrap();
    site.dispatch(Signal::Submit {
        form: "ghost".into(),
    })
    .unwrap();
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn chrome_signals_route_to_chrome() {
    let (site, mut rx) = site();
    site.dispatch(click(Target::MenuToggle)).unwrap();
    site.dispatch(key(Key::Escape, None)).unwrap();
    site.dispatch(Signal::Intersect {
        element: "about".into(),
    })
    .unwrap();
    site.dispatch(Signal::Scroll { y: 500.0 }).unwrap();
    site.dispatch(click(Target::BackToTop)).unwrap();
    site.dispatch(click(Target::GalleryItem {
        src: "/img/g1.jpg".into(),
        caption: "Campus".into(),
    }))
    .unwrap();
    let effects = drain(&mut rx);
    assert_eq!(
        &effects[..6],
        &[
            Effect::MenuExpanded { expanded: true },
            Effect::MenuExpanded { expanded: false },
            Effect::Reveal {
                element: "about".into()
            },
            Effect::BackToTopVisible { visible: true },
            Effect::NavbarHidden { hidden: true },
            Effect::ScrollTo { y: 0 },
        ]
    );
    assert!(effects.contains(&Effect::GalleryImage {
        src: "/img/g1.jpg".into(),
        caption: "Campus".into()
    }));
    assert!(site.overlays().is_open(&oid("galleryModal")));
}

#[tokio::test(start_paused = true)]
async fn anchor_link_scrolls_below_navbar_and_focuses_section() {
    let (site, mut rx) = site();
    site.dispatch(click(Target::MenuToggle)).unwrap();
    site.dispatch(click(Target::Anchor {
        element: "courses".into(),
        offset: 900,
    }))
    .unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![
            Effect::MenuExpanded { expanded: true },
            Effect::MenuExpanded { expanded: false },
            Effect::ScrollTo { y: 810 },
            Effect::Focus {
                element: "courses".into()
            },
        ]
    );
    assert_eq!(site.overlays().focused(), Some("courses".into()));
}

#[tokio::test(start_paused = true)]
async fn gallery_replacing_a_modal_hands_back_page_focus() {
    let (site, mut rx) = site();
    site.dispatch(Signal::FocusChanged {
        element: Some("hero-cta".into()),
    })
    .unwrap();
    site.dispatch(click(Target::OpenOverlay(oid("enrollmentModal"))))
        .unwrap();
    site.dispatch(click(Target::GalleryItem {
        src: "/img/g2.jpg".into(),
        caption: "Lab".into(),
    }))
    .unwrap();
    drain(&mut rx);

    site.dispatch(key(Key::Escape, None)).unwrap();
    assert!(drain(&mut rx).contains(&Effect::Focus {
        element: "hero-cta".into()
    }));
    assert_eq!(site.overlays().focused(), Some("hero-cta".into()));
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_timers_and_closes_overlays() {
    let (site, _rx) = site();
    site.start().unwrap();
    site.dispatch(click(Target::OpenOverlay(oid("courseModal"))))
        .unwrap();
    site.shutdown().unwrap();
    assert_eq!(site.timers().pending(), 0);
    assert_eq!(site.overlays().current_exclusive(), None);
    assert!(!site.overlays().scroll_locked());
}

#[test]
fn duplicate_overlay_ids_are_fatal() {
    let cfg = Config::from_ron(r#"(overlays: [(id: "a"), (id: "a")])"#).unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let err = Site::new(&cfg, tx).err().unwrap();
    assert!(matches!(err, Error::DuplicateOverlay(id) if id.as_str() == "a"));
}
