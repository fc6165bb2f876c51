use serde::Serialize;

/// `{"status":"success","data":...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// `{"status":"success","message":...}`
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub status: &'static str,
    pub message: String,
}

impl MessageEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_envelope_shape() {
        let json = serde_json::to_value(Envelope::success(vec![1, 2])).unwrap();
        assert_eq!(json, json!({"status": "success", "data": [1, 2]}));
    }

    #[test]
    fn message_envelope_shape() {
        let json = serde_json::to_value(MessageEnvelope::success("User deleted")).unwrap();
        assert_eq!(json, json!({"status": "success", "message": "User deleted"}));
    }
}
