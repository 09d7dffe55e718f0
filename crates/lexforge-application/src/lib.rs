//! Application layer for LexForge.
//!
//! Use cases that drive the core domain through the `ContractApi` and
//! `IdentityResolver` seams: the wizard, the draft lifecycle, the contracts
//! board and the editor.

pub mod contracts;
pub mod editor;
pub mod lifecycle;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use contracts::ContractsBoard;
pub use editor::{EditorDocument, Section};
pub use lifecycle::{AuthRedirect, CompletedAction, DraftLifecycle, ResumeOutcome};
pub use wizard::{EntryDecision, EntryGate, PreviewOutcome, PreviewTicket, WizardSession};
