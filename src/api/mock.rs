//! Recording test double for [`HealthApi`]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::{ApiError, ApiResult, HealthApi, ServerReply};

/// Canned behaviour for a mocked call
#[derive(Debug, Clone)]
pub enum MockReply {
    Ok(Option<String>),
    Server(u16, String),
}

impl MockReply {
    fn into_result(self) -> ApiResult<ServerReply> {
        match self {
            MockReply::Ok(message) => Ok(ServerReply { message, token: None }),
            MockReply::Server(status, body) => Err(ApiError::from_response(status, &body)),
        }
    }
}

/// Records every call and answers with configured replies
pub struct MockHealthApi {
    pub submit_reply: MockReply,
    pub otp_reply: MockReply,
    pub verify_reply: MockReply,
    pub patient_ids: Option<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
    pub payloads: Mutex<Vec<Value>>,
}

impl MockHealthApi {
    pub fn new() -> Self {
        Self {
            submit_reply: MockReply::Ok(None),
            otp_reply: MockReply::Ok(None),
            verify_reply: MockReply::Ok(None),
            patient_ids: Some(vec!["P001".to_string(), "P002".to_string()]),
            calls: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_submit_reply(mut self, reply: MockReply) -> Self {
        self.submit_reply = reply;
        self
    }

    pub fn with_verify_reply(mut self, reply: MockReply) -> Self {
        self.verify_reply = reply;
        self
    }

    pub fn without_patient_ids(mut self) -> Self {
        self.patient_ids = None;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HealthApi for MockHealthApi {
    async fn send_otp(&self, phone: &str) -> ApiResult<ServerReply> {
        self.record(format!("send_otp:{}", phone));
        self.otp_reply.clone().into_result()
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> ApiResult<ServerReply> {
        self.record(format!("verify_otp:{}:{}", phone, otp));
        self.verify_reply.clone().into_result()
    }

    async fn fetch_patient_ids(&self) -> ApiResult<Vec<String>> {
        self.record("fetch_patient_ids".to_string());
        self.patient_ids.clone().ok_or(ApiError::ServerError {
            status: 500,
            message: None,
        })
    }

    async fn submit(&self, endpoint: &str, payload: &Value) -> ApiResult<ServerReply> {
        self.record(format!("submit:{}", endpoint));
        self.payloads.lock().unwrap().push(payload.clone());
        self.submit_reply.clone().into_result()
    }
}
