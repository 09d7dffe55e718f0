//! User profile and client address book.

mod model;

pub use model::{Client, EntityType, LegalEntityProfile, PhysicalPersonProfile, UserProfile};
