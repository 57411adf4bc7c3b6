//! WizardStateMachine -- drives a bundle draft through the wizard steps.
//!
//! The machine owns the current step, the current draft snapshot, the
//! recorded errors, and the "errors visible" flag. Forward moves are gated
//! by the step validators; backward moves never are. Submission assembles
//! the definition and hands it to a `BundlePlatform`; only a successful
//! platform response resets the session.
//!
//! The machine holds no locks. A second `submit` while one is in flight must
//! be prevented by the caller.

use thiserror::Error;

use bundler_types::bundle::{BundleDefinition, BundleDraft, BundleOperation};
use bundler_types::config::WizardConfig;
use bundler_types::wizard::{FieldErrors, Step, WizardSnapshot};

use crate::platform::{BundlePlatform, Notifier, ProductCatalog};

use super::assembler::BundleAssembler;
use super::edit::DraftEdit;
use super::validator;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of a `next()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Advanced { from: Step, to: Step },
    Blocked { step: Step, errors: FieldErrors },
    /// `next()` was called on the last step; use `submit()`.
    AtFinalStep,
}

/// Result of a `submit()` call that reached a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The platform accepted the bundle. The wizard has been reset.
    Created {
        definition: BundleDefinition,
        operation: BundleOperation,
    },
    /// Final-step validation failed; the platform was not called.
    Rejected { errors: FieldErrors },
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("bundles can only be submitted from the final step (currently on '{0}')")]
    NotOnFinalStep(Step),

    /// Platform user error or transport failure, flattened to one message.
    #[error("{0}")]
    Platform(String),
}

// ---------------------------------------------------------------------------
// WizardStateMachine
// ---------------------------------------------------------------------------

pub struct WizardStateMachine<N: Notifier> {
    config: WizardConfig,
    step: usize,
    draft: BundleDraft,
    errors: FieldErrors,
    errors_visible: bool,
    initial: BundleDraft,
    notifier: N,
}

impl<N: Notifier> WizardStateMachine<N> {
    /// Start a session on step 1 with an empty draft dated today.
    pub fn new(config: WizardConfig, notifier: N) -> Self {
        Self::with_initial_draft(config, BundleDraft::default(), notifier)
    }

    /// Start a session from a specific initial draft. The machine resets to
    /// this draft after a successful submission.
    pub fn with_initial_draft(config: WizardConfig, initial: BundleDraft, notifier: N) -> Self {
        Self {
            config,
            step: 1,
            draft: initial.clone(),
            errors: FieldErrors::new(),
            errors_visible: false,
            initial,
            notifier,
        }
    }

    /// Resume a session from a saved snapshot.
    ///
    /// The step is clamped into the configured sequence and every product
    /// quantity to at least 1.
    pub fn restore(snapshot: WizardSnapshot, notifier: N) -> Self {
        let step_count = Step::sequence(&snapshot.config).len();
        let mut draft = snapshot.draft;
        for product in &mut draft.products {
            product.quantity = product.quantity.max(1);
        }
        Self {
            config: snapshot.config,
            step: snapshot.step.clamp(1, step_count),
            draft,
            errors: snapshot.errors,
            errors_visible: snapshot.errors_visible,
            initial: BundleDraft::default(),
            notifier,
        }
    }

    /// Serializable view of the current session.
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            config: self.config,
            step: self.step,
            draft: self.draft.clone(),
            errors: self.errors.clone(),
            errors_visible: self.errors_visible,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn steps(&self) -> &'static [Step] {
        Step::sequence(&self.config)
    }

    /// 1-based index of the current step.
    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    pub fn current_step(&self) -> Step {
        self.steps()[self.step - 1]
    }

    pub fn is_final_step(&self) -> bool {
        self.step == self.step_count()
    }

    pub fn progress_percent(&self) -> u8 {
        ((self.step * 100) / self.step_count()) as u8
    }

    pub fn draft(&self) -> &BundleDraft {
        &self.draft
    }

    /// Errors recorded by the last gated transition (minus fields edited since).
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the surface should render `errors()`.
    pub fn errors_visible(&self) -> bool {
        self.errors_visible
    }

    /// Option errors computed from the current draft, independent of any
    /// transition. Surfaces show these while the user toggles values.
    pub fn live_errors(&self) -> FieldErrors {
        validator::option_errors(&self.draft)
    }

    // -- editing ------------------------------------------------------------

    /// Replace the draft with the edited snapshot and clear only the errors
    /// on fields the edit touched.
    pub fn apply(&mut self, edit: DraftEdit) {
        self.draft = edit.apply(&self.draft);
        self.errors.retain(|field, _| !edit.touches(field));
    }

    /// Look up products in the catalog and merge them into the selection.
    ///
    /// A catalog failure is logged and leaves the draft unchanged; returns
    /// whether the selection was applied.
    pub async fn pick_products<C: ProductCatalog>(
        &mut self,
        catalog: &C,
        product_ids: &[String],
    ) -> bool {
        match catalog.fetch_products(product_ids).await {
            Ok(picked) => {
                tracing::debug!(count = picked.len(), "catalog selection received");
                self.apply(DraftEdit::SelectProducts { picked });
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "product selection failed, draft unchanged");
                false
            }
        }
    }

    // -- transitions --------------------------------------------------------

    /// Validate the current step and advance if it passes.
    pub fn next(&mut self) -> Transition {
        if self.is_final_step() {
            return Transition::AtFinalStep;
        }

        let step = self.current_step();
        let errors = validator::validate_step(step, &self.draft);
        if !errors.is_empty() {
            tracing::debug!(%step, error_count = errors.len(), "step blocked");
            self.block(errors.clone());
            return Transition::Blocked { step, errors };
        }

        self.step += 1;
        self.errors.clear();
        self.errors_visible = false;
        let to = self.current_step();
        tracing::debug!(from = %step, %to, "step advanced");
        Transition::Advanced { from: step, to }
    }

    /// Go back one step without validating. Stays on step 1.
    pub fn previous(&mut self) -> Step {
        if self.step > 1 {
            self.step -= 1;
        }
        self.errors_visible = false;
        self.current_step()
    }

    /// Validate the final step, assemble the definition, and register it.
    ///
    /// The draft is only touched after the platform answers: on success the
    /// session resets to the initial draft on step 1; on failure nothing
    /// changes and the flattened platform message is returned.
    pub async fn submit<P: BundlePlatform>(
        &mut self,
        platform: &P,
    ) -> Result<SubmitOutcome, SubmitError> {
        let step = self.current_step();
        if !self.is_final_step() {
            return Err(SubmitError::NotOnFinalStep(step));
        }

        // Options are editable on any step; re-check all of them here.
        let mut errors = validator::validate_step(step, &self.draft);
        errors.extend(validator::option_errors(&self.draft));
        if !errors.is_empty() {
            self.block(errors.clone());
            return Ok(SubmitOutcome::Rejected { errors });
        }

        let definition = BundleAssembler::assemble(&self.draft);
        tracing::info!(
            title = %definition.title,
            components = definition.components.len(),
            "submitting bundle"
        );

        let operation = platform.create_bundle(&definition).await.map_err(|err| {
            tracing::warn!(error = %err, "bundle creation failed");
            SubmitError::Platform(err.to_string())
        })?;

        self.notifier.success("Bundle created successfully!");
        self.reset();

        Ok(SubmitOutcome::Created {
            definition,
            operation,
        })
    }

    fn block(&mut self, errors: FieldErrors) {
        self.errors = errors;
        self.errors_visible = true;
    }

    fn reset(&mut self) {
        self.step = 1;
        self.draft = self.initial.clone();
        self.errors.clear();
        self.errors_visible = false;
    }
}
