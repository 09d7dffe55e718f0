//! Core domain of the LexForge contract wizard.
//!
//! This crate holds the contract model, the storage bridge, identity
//! resolution and the traits the outer layers implement
//! ([`api::ContractApi`], [`identity::IdentityProvider`],
//! [`storage::KeyValueStore`], [`resume::ResumeTokenCodec`]).

pub mod api;
pub mod config;
pub mod contract;
pub mod editor;
pub mod error;
pub mod identity;
pub mod profile;
pub mod resume;
pub mod route;
pub mod storage;

pub use error::{LexforgeError, Result};
