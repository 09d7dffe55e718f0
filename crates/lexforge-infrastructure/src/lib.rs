//! Infrastructure adapters for LexForge: the REST client, file-backed
//! storage, configuration loading and the resume token codec.

pub mod config_service;
pub mod dto;
pub mod http_api;
pub mod paths;
pub mod resume_token_codec;
pub mod storage;

pub use config_service::ConfigService;
pub use http_api::HttpContractApi;
pub use paths::LexforgePaths;
pub use resume_token_codec::Base64ResumeTokenCodec;
pub use storage::JsonFileStore;
