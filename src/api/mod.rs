//! Client for the remote health backend
//!
//! The backend is an opaque REST service. Screens never talk HTTP directly; they
//! go through [`HealthApi`] so the submission flow can be exercised against a
//! test double.

pub mod client;
pub mod errors;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::HttpHealthApi;
pub use errors::*;
pub use types::ServerReply;

use async_trait::async_trait;
use serde_json::Value;

/// Endpoint paths relative to the configured base URL
pub mod endpoints {
    pub const SEND_OTP: &str = "auth/send-otp";
    pub const VERIFY_OTP: &str = "auth/verify-otp";
    pub const PATIENT_IDS: &str = "patients/ids";
    pub const PATIENTS: &str = "patients";
    pub const CLINICAL_PROFILE: &str = "clinical-profile";
    pub const METABOLIC_PROFILE: &str = "metabolic-profile";
    pub const SLEEP_RITUAL: &str = "sleep-ritual";
    pub const DIET_LOG: &str = "diet-log";
    pub const WATER_INTAKE: &str = "water-intake";
    pub const EXERCISE: &str = "exercise";
    pub const MEDICATION: &str = "medication";
}

/// Operations the app performs against the backend
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// Ask the backend to send a one-time password to `phone`
    async fn send_otp(&self, phone: &str) -> ApiResult<ServerReply>;

    /// Verify the one-time password typed by the user
    async fn verify_otp(&self, phone: &str, otp: &str) -> ApiResult<ServerReply>;

    /// List the ids of registered patients
    async fn fetch_patient_ids(&self) -> ApiResult<Vec<String>>;

    /// POST a screen payload to `endpoint`
    async fn submit(&self, endpoint: &str, payload: &Value) -> ApiResult<ServerReply>;
}
