use std::sync::Arc;

use marquee_protocol::{Effect, FieldName, FormId};
use parking_lot::Mutex;

use crate::{EffectDispatcher, Error, Result};

/// A validated form ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Submitted form.
    pub form: FormId,
    /// Trimmed values in field order.
    pub values: Vec<(FieldName, String)>,
}

/// Collaborator that receives validated forms.
pub trait Submitter: Send + Sync {
    /// Send `submission`. An error keeps the form filled in and open.
    fn submit(&self, submission: &Submission) -> Result<()>;
}

/// Hands submissions to the host as `Submitted` effects.
pub struct EffectSubmitter {
    effects: EffectDispatcher,
}

impl EffectSubmitter {
    /// Submit through `effects`.
    pub fn new(effects: EffectDispatcher) -> Self {
        Self { effects }
    }
}

impl Submitter for EffectSubmitter {
    fn submit(&self, submission: &Submission) -> Result<()> {
        self.effects.emit(Effect::Submitted {
            form: submission.form.clone(),
            values: submission.values.clone(),
        })
    }
}

/// Records submissions in memory; optionally rejects them.
#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    seen: Arc<Mutex<Vec<Submission>>>,
    reject: Arc<Mutex<Option<String>>>,
}

impl RecordingSubmitter {
    /// An empty recorder that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every later submission with `message`.
    pub fn reject_with(&self, message: impl Into<String>) {
        *self.reject.lock() = Some(message.into());
    }

    /// Submissions accepted so far.
    pub fn submissions(&self) -> Vec<Submission> {
        self.seen.lock().clone()
    }
}

impl Submitter for RecordingSubmitter {
    fn submit(&self, submission: &Submission) -> Result<()> {
        if let Some(message) = self.reject.lock().clone() {
            return Err(Error::Submit {
                form: submission.form.clone(),
                message,
            });
        }
        self.seen.lock().push(submission.clone());
        Ok(())
    }
}
