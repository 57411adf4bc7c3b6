//! Bundle wizard.
//!
//! Defines the per-step validators, the draft edits a surface can apply,
//! the `WizardStateMachine` that gates transitions, the `BundleAssembler`
//! that produces the platform definition, and the persistence trait for
//! resumable wizard drafts.

pub mod assembler;
pub mod draft_store;
pub mod edit;
pub mod machine;
pub mod validator;
