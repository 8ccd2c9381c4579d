pub mod claims;
pub mod dto;
pub(crate) mod extractors;
pub mod jwt;
pub mod memory_repo;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
