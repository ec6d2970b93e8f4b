//! Wire types exchanged with the health backend

use serde::{Deserialize, Serialize};

/// Request body for `POST /auth/send-otp`
#[derive(Debug, Clone, Serialize)]
pub struct SendOtpRequest<'a> {
    pub phone: &'a str,
}

/// Request body for `POST /auth/verify-otp`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub phone: &'a str,
    pub otp: &'a str,
}

/// Generic success reply; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// A patient record as returned by the id listing
#[derive(Debug, Clone, Deserialize)]
pub struct PatientRecord {
    #[serde(alias = "patientID", alias = "patientId", alias = "patient_id")]
    pub id: String,
}

/// The id listing comes in several shapes depending on the backend version
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatientIdsResponse {
    Plain(Vec<String>),
    Records(Vec<PatientRecord>),
    Wrapped {
        #[serde(alias = "patientIds", alias = "patientIDs", alias = "data")]
        patient_ids: Vec<String>,
    },
}

impl PatientIdsResponse {
    pub fn into_ids(self) -> Vec<String> {
        match self {
            PatientIdsResponse::Plain(ids) => ids,
            PatientIdsResponse::Records(records) => records.into_iter().map(|r| r.id).collect(),
            PatientIdsResponse::Wrapped { patient_ids } => patient_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_shapes() {
        let plain: PatientIdsResponse = serde_json::from_str(r#"["P001", "P002"]"#).unwrap();
        assert_eq!(plain.into_ids(), vec!["P001", "P002"]);

        let records: PatientIdsResponse =
            serde_json::from_str(r#"[{"patientID": "P010", "name": "Kavya"}]"#).unwrap();
        assert_eq!(records.into_ids(), vec!["P010"]);

        let wrapped: PatientIdsResponse =
            serde_json::from_str(r#"{"patientIds": ["P100"]}"#).unwrap();
        assert_eq!(wrapped.into_ids(), vec!["P100"]);
    }

    #[test]
    fn test_reply_tolerates_missing_fields() {
        let reply: ServerReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply, ServerReply::default());

        let reply: ServerReply =
            serde_json::from_str(r#"{"message": "Saved", "extra": 1}"#).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Saved"));
    }
}
