// File: src/services/mod.rs

pub mod admission_service;
pub mod rule_resolver;
pub mod scope;

pub use admission_service::{AdmissionService, Decision};
pub use rule_resolver::RuleResolver;
pub use scope::derive_scope_key;
