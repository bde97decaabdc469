//! Form state machine around one submission at a time.
//!
//! This is the client-side half of the product: collect input, refuse to
//! submit until the required fields are non-empty, run exactly one request,
//! and land in `Success` or `Failed`. A successful verdict is also appended
//! to history (best-effort; history problems never fail a submission).

mod criteria;

pub use criteria::parse_criteria;

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{
    CoachClient, CoachError, DecisionOutput, DecisionRequest, ErrorKind, ExplainLevel, Mode,
};
use crate::history::{HistoryEntry, HistoryStore};

/// Raw form fields, exactly as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub decision: String,
    pub option_a: String,
    pub option_b: String,
    pub user_context: String,
    /// Criteria textarea, one `label[:-]weight` or bare label per line.
    pub criteria_text: String,
    /// Free-text framing; when set, it replaces the structured fields.
    pub prompt: Option<String>,
    pub mode: Option<Mode>,
    pub explain: Option<ExplainLevel>,
}

/// Submission lifecycle for the current form instance.
#[derive(Debug, Clone)]
pub enum SubmitStatus {
    Idle,
    Validating,
    Pending,
    Success(DecisionOutput),
    Failed(ErrorKind, String),
}

pub struct FormClient {
    client: CoachClient,
    history: Arc<dyn HistoryStore>,
    pub input: FormInput,
    status: SubmitStatus,
}

impl FormClient {
    pub fn new(client: CoachClient, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            client,
            history,
            input: FormInput::default(),
            status: SubmitStatus::Idle,
        }
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// Last verdict, if the previous submission succeeded.
    pub fn output(&self) -> Option<&DecisionOutput> {
        match &self.status {
            SubmitStatus::Success(output) => Some(output),
            _ => None,
        }
    }

    /// Required-field check after trimming. Free-text mode requires the
    /// prompt instead of the structured trio.
    fn validate(&self) -> Result<(), CoachError> {
        if let Some(prompt) = &self.input.prompt {
            if prompt.trim().is_empty() {
                return Err(CoachError::Validation(
                    "Describe your decision before submitting.".into(),
                ));
            }
            return Ok(());
        }

        if self.input.decision.trim().is_empty() {
            return Err(CoachError::Validation(
                "Describe the decision you are facing.".into(),
            ));
        }
        if self.input.option_a.trim().is_empty() {
            return Err(CoachError::Validation("Option A is required.".into()));
        }
        if self.input.option_b.trim().is_empty() {
            return Err(CoachError::Validation("Option B is required.".into()));
        }
        Ok(())
    }

    /// Build the wire payload from the current fields.
    pub fn to_request(&self) -> DecisionRequest {
        let user_context = self.input.user_context.trim();

        DecisionRequest {
            decision: self.input.decision.trim().to_string(),
            option_a: self.input.option_a.trim().to_string(),
            option_b: self.input.option_b.trim().to_string(),
            user_context: (!user_context.is_empty()).then(|| user_context.to_string()),
            criteria: parse_criteria(&self.input.criteria_text),
            prompt: self
                .input
                .prompt
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            mode: self.input.mode,
            explain: self.input.explain,
        }
    }

    /// Run one submission.
    ///
    /// While a submission is pending, further calls return without touching
    /// the network (the form's submit control is disabled). Validation
    /// failures also never reach the network. A later submission may still
    /// overwrite an earlier in-flight result; that race is accepted.
    pub async fn submit(&mut self) {
        if matches!(self.status, SubmitStatus::Pending) {
            return;
        }

        self.status = SubmitStatus::Validating;
        if let Err(e) = self.validate() {
            self.status = SubmitStatus::Failed(e.kind(), e.to_string());
            return;
        }

        let request = self.to_request();
        self.status = SubmitStatus::Pending;

        match self.client.submit(&request).await {
            Ok(output) => {
                info!(recommendation = output.recommendation.as_str(), "verdict received");
                let entry = HistoryEntry::from_submission(&request, &output);
                if let Err(e) = self.history.save(&entry).await {
                    warn!("failed to record history entry: {e}");
                }
                self.status = SubmitStatus::Success(output);
            }
            Err(e) => {
                self.status = SubmitStatus::Failed(e.kind(), e.to_string());
            }
        }
    }

    /// Prefill the form from a stored history entry.
    pub fn load_entry(&mut self, entry: &HistoryEntry) {
        self.input = FormInput {
            decision: entry.decision.clone(),
            mode: entry.mode,
            ..FormInput::default()
        };
        self.status = SubmitStatus::Idle;
    }
}
