use crate::error::SignalingError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Typed view of the `description` payload carried by offer/answer envelopes.
///
/// The relay forwards the payload as opaque JSON; only the endpoints decode it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescription {
    pub sdp: String,
    #[serde(rename = "type")]
    pub kind: SdpKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_video: Option<bool>,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp: sdp.into(),
            kind: SdpKind::Offer,
            is_video: None,
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp: sdp.into(),
            kind: SdpKind::Answer,
            is_video: None,
        }
    }

    pub fn with_video(mut self, is_video: bool) -> Self {
        self.is_video = Some(is_video);
        self
    }

    /// Decodes and validates a payload, requiring the given description kind.
    pub fn from_payload(payload: &Value, expected: SdpKind) -> Result<Self, SignalingError> {
        let description: Self = serde_json::from_value(payload.clone())
            .map_err(|e| SignalingError::malformed_payload("description", e))?;

        if description.kind != expected {
            return Err(SignalingError::malformed_payload(
                "description",
                format!("expected {:?}, got {:?}", expected, description.kind),
            ));
        }
        if description.sdp.trim().is_empty() {
            return Err(SignalingError::malformed_payload("description", "empty sdp"));
        }

        Ok(description)
    }

    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "sdp": self.sdp,
            "type": self.kind,
        });
        if let (Some(is_video), Some(map)) = (self.is_video, payload.as_object_mut()) {
            map.insert("isVideo".to_owned(), Value::Bool(is_video));
        }
        payload
    }
}
