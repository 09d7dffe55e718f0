//! Versioned data transfer objects.

pub mod resume_token;

pub use resume_token::{RESUME_TOKEN_ENTITY, create_resume_token_migrator};
