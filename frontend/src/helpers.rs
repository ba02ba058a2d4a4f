use serde_json::Value;

pub const LOADING: &str = "Loading...";

/// `/data/temp` answers with a bare value. A quoted JSON string is shown without its quotes,
/// anything else as sent.
pub fn temperature_text(body: String) -> String {
    match serde_json::from_str::<String>(body.trim()) {
        Ok(text) => text,
        Err(_) => body,
    }
}

pub fn empty_payload() -> Value {
    Value::Object(Default::default())
}

pub fn payload_text(payload: &Value) -> String {
    payload.to_string()
}
