#[cfg(test)]
mod tests {
    use marquee_protocol::{FieldKind, OverlayKind, SlideSet};

    use crate::*;

    const SITE: &str = r#"(
        options: (autoAdvanceMs: 4000, popupCooldownMs: 60000),
        overlays: [
            (id: "enrollmentModal", focus: Some("enroll-name")),
            (id: "courseModal"),
            (id: "counsellingPopup", kind: popup),
        ],
        carousels: [
            (
                id: "header",
                slides: [(element: "slide-1", background: Some("/img/1.jpg")), (element: "slide-2")],
                mobile_slides: [(element: "slide-m1")],
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
                    (name: "course", element: "courseName"),
                ],
            ),
        ],
        popup: Some((overlay: "counsellingPopup")),
        enrollment: Some((overlay: "enrollmentModal", form: "enrollmentForm", course_field: "course")),
    )"#;

    #[test]
    fn full_site_parses() {
        let cfg = Config::from_ron(SITE).unwrap();
        assert_eq!(cfg.options.auto_advance_ms, 4000);
        assert_eq!(cfg.options.popup_cooldown_ms, 60000);
        // Untouched options keep their defaults.
        assert_eq!(cfg.options.transition_settle_ms, 100);
        assert_eq!(cfg.options.mobile_breakpoint_px, 768);

        assert_eq!(cfg.overlays.len(), 3);
        assert!(cfg.overlays[0].is_exclusive());
        assert_eq!(cfg.overlays[2].kind, OverlayKind::Popup);
        assert!(!cfg.overlays[2].is_exclusive());

        assert_eq!(cfg.carousels[0].mobile_slides.len(), 1);
        assert_eq!(
            cfg.carousels[0].slides[0].background.as_deref(),
            Some("/img/1.jpg")
        );
        assert_eq!(cfg.forms[0].fields[1].kind, FieldKind::Email);
    }

    #[test]
    fn json_matches_ron() {
        let json = r#"{
            "options": {"autoAdvanceMs": 4000},
            "overlays": [{"id": "demoModal", "focus": "demo-name"}],
            "gallery": "demoModal"
        }"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.options.auto_advance_ms, 4000);
        assert_eq!(cfg.overlays[0].focus.as_ref().unwrap().as_str(), "demo-name");
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = Config::from_ron("()").unwrap();
        assert_eq!(cfg.options, Options::default());
        assert!(cfg.overlays.is_empty());
    }

    #[test]
    fn breakpoint_selects_slide_set() {
        let o = Options::default();
        assert_eq!(o.slide_set_for(768), SlideSet::Mobile);
        assert_eq!(o.slide_set_for(769), SlideSet::Desktop);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = Config::from_ron("(options: (autoAdvance: 10))").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn parse_error_carries_location() {
        let err = Config::from_json("{\n  \"options\": {\n    \"autoAdvanceMs\": \"soon\"\n  }\n}")
            .unwrap_err();
        match &err {
            Error::Parse { line, excerpt, .. } => {
                assert_eq!(*line, Some(3));
                assert!(excerpt.as_deref().unwrap().contains('^'));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn zero_duration_fails_validation() {
        let err = Config::from_ron("(options: (transitionSettleMs: 0))").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.pretty().contains("transitionSettleMs"));
    }

    #[test]
    fn exclusive_popup_fails_validation() {
        let ron = r#"(
            overlays: [(id: "p", kind: popup, exclusive: Some(true))],
            popup: Some((overlay: "p")),
        )"#;
        let err = Config::from_ron(ron).unwrap_err();
        assert!(err.to_string().contains("must not be exclusive"));
    }

    #[test]
    fn dangling_references_fail_validation() {
        let cases = [
            r#"(popup: Some((overlay: "nope")))"#,
            r#"(gallery: Some("nope"))"#,
            r#"(forms: [(id: "f", overlay: Some("nope"), fields: [])])"#,
            r#"(
                overlays: [(id: "m")],
                forms: [(id: "f", fields: [(name: "a", element: "a")])],
                enrollment: Some((overlay: "m", form: "f", course_field: "course")),
            )"#,
        ];
        for ron in cases {
            let err = Config::from_ron(ron).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{ron}: {err:?}");
        }
    }

    #[test]
    fn hero_pair_parses_and_must_differ() {
        let cfg = Config::from_ron(
            r#"(options: (navbarHeightPx: 64), hero: Some((desktop: "hero-d", mobile: "hero-m")))"#,
        )
        .unwrap();
        assert_eq!(cfg.options.navbar_height_px, 64);
        assert_eq!(cfg.options.anchor_margin_px, 20);
        assert_eq!(cfg.hero.unwrap().mobile.as_str(), "hero-m");

        let err =
            Config::from_ron(r#"(hero: Some((desktop: "hero", mobile: "hero")))"#).unwrap_err();
        assert!(err.to_string().contains("both layouts"));
    }

    #[test]
    fn duplicate_carousel_ids_fail_validation() {
        let ron = r#"(carousels: [(id: "c", slides: []), (id: "c", slides: [])])"#;
        let err = Config::from_ron(ron).unwrap_err();
        assert!(err.to_string().contains("duplicate carousel id"));
    }
}
