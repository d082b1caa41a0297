// botgate-core/src/lib.rs

pub mod clock;
pub mod config;
pub mod services;
pub mod store;
pub mod test_utils;

pub use botgate_common::Error;
pub use botgate_common::models;
pub use clock::{Clock, SystemClock};
pub use config::AdmissionConfig;
pub use services::admission_service::{AdmissionService, Decision};
