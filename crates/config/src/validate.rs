//! Consistency checks run after parsing.

use std::collections::HashSet;

use crate::{Config, Error};

/// Check that a parsed configuration is internally consistent.
///
/// Duplicate overlay ids are rejected later, by overlay registration in the
/// engine.
pub(crate) fn validate(cfg: &Config) -> Result<(), Error> {
    for (name, ms) in cfg.options.durations() {
        if ms == 0 {
            return Err(Error::invalid(format!("option {name} must be greater than zero")));
        }
    }
    if cfg.options.mobile_breakpoint_px == 0 {
        return Err(Error::invalid(
            "option mobileBreakpointPx must be greater than zero",
        ));
    }

    let mut carousels = HashSet::new();
    for c in &cfg.carousels {
        if !carousels.insert(c.id.as_str()) {
            return Err(Error::invalid(format!("duplicate carousel id '{}'", c.id)));
        }
        if c.auto_advance_ms == Some(0) {
            return Err(Error::invalid(format!(
                "carousel '{}': auto_advance_ms must be greater than zero",
                c.id
            )));
        }
    }

    let mut forms = HashSet::new();
    for f in &cfg.forms {
        if !forms.insert(f.id.as_str()) {
            return Err(Error::invalid(format!("duplicate form id '{}'", f.id)));
        }
        let mut names = HashSet::new();
        for field in &f.fields {
            if !names.insert(field.name.as_str()) {
                return Err(Error::invalid(format!(
                    "form '{}': duplicate field '{}'",
                    f.id, field.name
                )));
            }
        }
        if let Some(o) = &f.overlay
            && cfg.overlay(o).is_none()
        {
            return Err(Error::invalid(format!(
                "form '{}' refers to unknown overlay '{}'",
                f.id, o
            )));
        }
    }

    if let Some(popup) = &cfg.popup {
        match cfg.overlay(&popup.overlay) {
            None => {
                return Err(Error::invalid(format!(
                    "popup refers to unknown overlay '{}'",
                    popup.overlay
                )));
            }
            Some(spec) if spec.is_exclusive() => {
                return Err(Error::invalid(format!(
                    "popup overlay '{}' must not be exclusive",
                    popup.overlay
                )));
            }
            Some(_) => {}
        }
    }

    if let Some(en) = &cfg.enrollment {
        if cfg.overlay(&en.overlay).is_none() {
            return Err(Error::invalid(format!(
                "enrollment refers to unknown overlay '{}'",
                en.overlay
            )));
        }
        let Some(form) = cfg.form(&en.form) else {
            return Err(Error::invalid(format!(
                "enrollment refers to unknown form '{}'",
                en.form
            )));
        };
        if !form.fields.iter().any(|f| f.name == en.course_field) {
            return Err(Error::invalid(format!(
                "enrollment course field '{}' is not a field of form '{}'",
                en.course_field, en.form
            )));
        }
    }

    if let Some(g) = &cfg.gallery
        && cfg.overlay(g).is_none()
    {
        return Err(Error::invalid(format!(
            "gallery refers to unknown overlay '{}'",
            g
        )));
    }
    if let Some(hero) = &cfg.hero
        && hero.desktop == hero.mobile
    {
        return Err(Error::invalid(format!(
            "hero uses '{}' for both layouts",
            hero.desktop
        )));
    }
    Ok(())
}
