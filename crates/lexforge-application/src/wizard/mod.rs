//! The contract wizard: container, entry gate and steps.

pub mod entry;
pub mod session;
pub mod steps;

pub use entry::{EntryDecision, EntryGate};
pub use session::{PreviewOutcome, PreviewTicket, WizardSession};
