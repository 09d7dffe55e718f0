pub mod clients;
pub mod contracts;
pub mod editor;
pub mod profile;
pub mod resume;
pub mod utils;
pub mod wizard;
