//! Field validation and the form controller.
//!
//! [`validate`] is a pure function over one field. [`Forms`] tracks values fed
//! by input signals, shows and clears messages, and on a clean submit hands
//! the values to a [`Submitter`].

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use config::FormSpec;
use marquee_protocol::{Effect, ElementId, FieldKind, FieldName, FormId, OverlayId};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::{EffectDispatcher, Error, OverlayManager, Result, Submission, Submitter};

/// Message for an empty required field.
pub const REQUIRED: &str = "required";
/// Message for a malformed email address.
pub const INVALID_EMAIL: &str = "invalid email";
/// Message for a malformed phone number.
pub const INVALID_PHONE: &str = "invalid phone";

/// Fewest digits a phone number may have.
const MIN_PHONE_DIGITS: usize = 10;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone pattern")
});

/// One field to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Input type.
    pub kind: FieldKind,
    /// Whether an empty value fails.
    pub required: bool,
    /// Raw value; surrounding whitespace is ignored.
    pub value: &'a str,
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidationResult {
    /// Whether the value passed.
    pub valid: bool,
    /// Set exactly when `valid` is false.
    pub message: Option<&'static str>,
}

impl FieldValidationResult {
    const OK: Self = Self {
        valid: true,
        message: None,
    };

    fn fail(message: &'static str) -> Self {
        Self {
            valid: false,
            message: Some(message),
        }
    }
}

/// Validate a field's trimmed value.
pub fn validate(field: &Field<'_>) -> FieldValidationResult {
    let value = field.value.trim();
    if value.is_empty() {
        return if field.required {
            FieldValidationResult::fail(REQUIRED)
        } else {
            FieldValidationResult::OK
        };
    }
    match field.kind {
        FieldKind::Text => FieldValidationResult::OK,
        FieldKind::Email if EMAIL.is_match(value) => FieldValidationResult::OK,
        FieldKind::Email => FieldValidationResult::fail(INVALID_EMAIL),
        FieldKind::Tel => {
            let digits = value.chars().filter(char::is_ascii_digit).count();
            if PHONE.is_match(value) && digits >= MIN_PHONE_DIGITS {
                FieldValidationResult::OK
            } else {
                FieldValidationResult::fail(INVALID_PHONE)
            }
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every field passed and the submitter accepted the values.
    Submitted,
    /// These fields failed, in form order; the first one has focus.
    Blocked(Vec<FieldName>),
}

struct FieldDef {
    name: FieldName,
    element: ElementId,
    kind: FieldKind,
    required: bool,
}

struct FormSlot {
    fields: Vec<FieldDef>,
    overlay: Option<OverlayId>,
    values: HashMap<FieldName, String>,
    errors: HashSet<FieldName>,
}

impl FormSlot {
    fn value(&self, name: &FieldName) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    fn check(&self, def: &FieldDef) -> FieldValidationResult {
        validate(&Field {
            kind: def.kind,
            required: def.required,
            value: self.value(&def.name),
        })
    }

    /// Record `result` for `name`, returning the effect to emit if the shown
    /// message changes.
    fn note(&mut self, form: &FormId, name: &FieldName, result: FieldValidationResult) -> Option<Effect> {
        let had_error = self.errors.contains(name);
        match result.message {
            Some(message) => {
                self.errors.insert(name.clone());
                Some(Effect::FieldError {
                    form: form.clone(),
                    field: name.clone(),
                    message: Some(message.to_string()),
                })
            }
            None if had_error => {
                self.errors.remove(name);
                Some(Effect::FieldError {
                    form: form.clone(),
                    field: name.clone(),
                    message: None,
                })
            }
            None => None,
        }
    }
}

/// Form controller. Clones share the same forms.
#[derive(Clone)]
pub struct Forms {
    slots: Arc<Mutex<HashMap<FormId, FormSlot>>>,
    overlays: OverlayManager,
    effects: EffectDispatcher,
    submitter: Arc<dyn Submitter>,
}

impl Forms {
    /// An empty controller. Invalid submissions move focus through `overlays`.
    pub fn new(
        overlays: OverlayManager,
        effects: EffectDispatcher,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            overlays,
            effects,
            submitter,
        }
    }

    /// Add a form from its configuration entry.
    pub fn add(&self, spec: &FormSpec) {
        let fields = spec
            .fields
            .iter()
            .map(|f| FieldDef {
                name: f.name.clone(),
                element: f.element.clone(),
                kind: f.kind,
                required: f.required,
            })
            .collect();
        self.slots.lock().insert(
            spec.id.clone(),
            FormSlot {
                fields,
                overlay: spec.overlay.clone(),
                values: HashMap::new(),
                errors: HashSet::new(),
            },
        );
    }

    /// The visitor typed into `field`. Clears any message it shows.
    pub fn input(&self, form: &FormId, field: &FieldName, value: &str) -> Result<()> {
        let effect = {
            let mut slots = self.slots.lock();
            let slot = slots
                .get_mut(form)
                .ok_or_else(|| Error::UnknownForm(form.clone()))?;
            if !slot.fields.iter().any(|f| &f.name == field) {
                warn!(form = %form, field = %field, "form_unknown_field");
                return Ok(());
            }
            slot.values.insert(field.clone(), value.to_string());
            slot.note(form, field, FieldValidationResult::OK)
        };
        if let Some(effect) = effect {
            self.effects.emit(effect)?;
        }
        Ok(())
    }

    /// `field` lost focus: validate it and show or clear its message.
    pub fn blur(&self, form: &FormId, field: &FieldName) -> Result<FieldValidationResult> {
        let (result, effect) = {
            let mut slots = self.slots.lock();
            let slot = slots
                .get_mut(form)
                .ok_or_else(|| Error::UnknownForm(form.clone()))?;
            let Some(def) = slot.fields.iter().find(|f| &f.name == field) else {
                warn!(form = %form, field = %field, "form_unknown_field");
                return Ok(FieldValidationResult::OK);
            };
            let result = slot.check(def);
            (result, slot.note(form, field, result))
        };
        trace!(form = %form, field = %field, valid = result.valid, "form_blur");
        if let Some(effect) = effect {
            self.effects.emit(effect)?;
        }
        Ok(result)
    }

    /// Validate every field; on success submit, reset and close the owning overlay.
    pub fn submit(&self, form: &FormId) -> Result<SubmitOutcome> {
        let (effects, invalid, first, submission, overlay) = {
            let mut slots = self.slots.lock();
            let slot = slots
                .get_mut(form)
                .ok_or_else(|| Error::UnknownForm(form.clone()))?;
            let results: Vec<(FieldName, ElementId, FieldValidationResult)> = slot
                .fields
                .iter()
                .map(|def| (def.name.clone(), def.element.clone(), slot.check(def)))
                .collect();
            let mut effects = Vec::new();
            let mut invalid = Vec::new();
            let mut first = None;
            for (name, element, result) in results {
                if !result.valid {
                    first.get_or_insert(element);
                    invalid.push(name.clone());
                }
                effects.extend(slot.note(form, &name, result));
            }
            let submission = Submission {
                form: form.clone(),
                values: slot
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), slot.value(&f.name).trim().to_string()))
                    .collect(),
            };
            (effects, invalid, first, submission, slot.overlay.clone())
        };
        self.effects.emit_all(effects)?;

        if let Some(element) = first {
            debug!(form = %form, invalid = invalid.len(), "form_blocked");
            self.overlays.focus(&element)?;
            return Ok(SubmitOutcome::Blocked(invalid));
        }

        self.submitter.submit(&submission)?;
        debug!(form = %form, "form_submitted");
        self.reset(form)?;
        if let Some(overlay) = overlay {
            self.overlays.close(&overlay)?;
        }
        Ok(SubmitOutcome::Submitted)
    }

    /// Write `value` into `field` as if the page had filled it in.
    pub fn prefill(&self, form: &FormId, field: &FieldName, value: &str) -> Result<()> {
        {
            let mut slots = self.slots.lock();
            let slot = slots
                .get_mut(form)
                .ok_or_else(|| Error::UnknownForm(form.clone()))?;
            if !slot.fields.iter().any(|f| &f.name == field) {
                warn!(form = %form, field = %field, "form_unknown_field");
                return Ok(());
            }
            slot.values.insert(field.clone(), value.to_string());
        }
        self.effects.emit(Effect::FieldValue {
            form: form.clone(),
            field: field.clone(),
            value: value.to_string(),
        })
    }

    /// Clear values and messages. A no-op on a clean form.
    pub fn reset(&self, form: &FormId) -> Result<()> {
        reset_slot(&self.slots, &self.effects, form)
    }

    /// A hook that resets `forms` when their overlay closes. Holds the form
    /// table weakly so the overlay manager does not keep it alive.
    pub fn reset_on_close(&self, forms: Vec<FormId>) -> impl Fn(&OverlayId) + Send + Sync + 'static {
        let slots = Arc::downgrade(&self.slots);
        let effects = self.effects.clone();
        move |overlay: &OverlayId| {
            let Some(slots) = slots.upgrade() else {
                return;
            };
            for form in &forms {
                if let Err(e) = reset_slot(&slots, &effects, form) {
                    warn!(overlay = %overlay, form = %form, error = %e, "form_reset_failed");
                }
            }
        }
    }

    /// Current value of `field`, if one was entered.
    pub fn value(&self, form: &FormId, field: &FieldName) -> Option<String> {
        self.slots.lock().get(form)?.values.get(field).cloned()
    }

    /// Whether `field` currently shows a message.
    pub fn has_error(&self, form: &FormId, field: &FieldName) -> bool {
        self.slots
            .lock()
            .get(form)
            .is_some_and(|s| s.errors.contains(field))
    }

    /// Forms owned by `overlay`.
    pub fn owned_by(&self, overlay: &OverlayId) -> Vec<FormId> {
        self.slots
            .lock()
            .iter()
            .filter(|(_, s)| s.overlay.as_ref() == Some(overlay))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

fn reset_slot(
    slots: &Mutex<HashMap<FormId, FormSlot>>,
    effects: &EffectDispatcher,
    form: &FormId,
) -> Result<()> {
    {
        let mut slots = slots.lock();
        let slot = slots
            .get_mut(form)
            .ok_or_else(|| Error::UnknownForm(form.clone()))?;
        if slot.values.is_empty() && slot.errors.is_empty() {
            return Ok(());
        }
        slot.values.clear();
        slot.errors.clear();
    }
    trace!(form = %form, "form_reset");
    effects.emit(Effect::FormReset { form: form.clone() })
}
