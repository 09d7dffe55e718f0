//! Contract domain: the wizard payload, the parties and the persisted entity.

pub mod catalog;
mod completeness;
mod entity;
mod model;
mod party;

pub use catalog::{AdditionalRight, CessionMode, ContractType};
pub use completeness::Completeness;
pub use entity::{Contract, ContractUpdate, DraftState};
pub use model::{ContractData, ContractPatch};
pub use party::{AuthorType, LegalEntity, Party, PhysicalPerson};
