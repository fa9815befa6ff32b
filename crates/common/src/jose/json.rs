use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

use super::{Header, Jose, Jwe, Jws, Recipient, Signature};

/// Strict unpadded base64url, as JOSE requires.
///  Non-zero trailing bits are rejected so decoding and
///  re-encoding always yields the original text.
pub(crate) fn decode_b64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(text)
}

pub(crate) fn encode_b64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

impl Jose {
    /// Serialize to JSON text in the general serialization.
    ///
    /// Signatures and recipients are always written as arrays, binary
    ///  members as unpadded base64url, and object keys in sorted order, so
    ///  every logical object has exactly one textual form no matter how it
    ///  was ingested.
    pub fn to_canonical_json(&self) -> Vec<u8> {
        self.to_canonical_json_string().into_bytes()
    }

    pub fn to_canonical_json_string(&self) -> String {
        let value = match self {
            Jose::Jws(jws) => jws_to_json(jws),
            Jose::Jwe(jwe) => jwe_to_json(jwe),
        };
        value.to_string()
    }
}

// keys are inserted in sorted order throughout, headers included, so the
//  output stays canonical even if serde_json is built with `preserve_order`
fn jws_to_json(jws: &Jws) -> Value {
    let mut object = Map::new();
    put_bytes(&mut object, "payload", jws.payload.as_deref());
    object.insert(
        "signatures".to_string(),
        Value::Array(jws.signatures.iter().map(signature_to_json).collect()),
    );
    Value::Object(object)
}

fn signature_to_json(signature: &Signature) -> Value {
    let mut object = Map::new();
    if let Some(header) = &signature.header {
        object.insert("header".to_string(), sorted_object(header));
    }
    put_bytes(&mut object, "protected", signature.protected.as_deref());
    put_bytes(&mut object, "signature", Some(&signature.signature));
    Value::Object(object)
}

fn jwe_to_json(jwe: &Jwe) -> Value {
    let mut object = Map::new();
    put_bytes(&mut object, "aad", jwe.aad.as_deref());
    put_bytes(&mut object, "ciphertext", Some(&jwe.ciphertext));
    put_bytes(&mut object, "iv", jwe.iv.as_deref());
    put_bytes(&mut object, "protected", jwe.protected.as_deref());
    object.insert(
        "recipients".to_string(),
        Value::Array(jwe.recipients.iter().map(recipient_to_json).collect()),
    );
    put_bytes(&mut object, "tag", jwe.tag.as_deref());
    if let Some(unprotected) = &jwe.unprotected {
        object.insert("unprotected".to_string(), sorted_object(unprotected));
    }
    Value::Object(object)
}

fn recipient_to_json(recipient: &Recipient) -> Value {
    let mut object = Map::new();
    put_bytes(&mut object, "encrypted_key", recipient.encrypted_key.as_deref());
    if let Some(header) = &recipient.header {
        object.insert("header".to_string(), sorted_object(header));
    }
    Value::Object(object)
}

fn sorted_object(object: &Header) -> Value {
    let mut members: Vec<_> = object.iter().collect();
    members.sort_by(|(a, _), (b, _)| a.cmp(b));
    Value::Object(
        members
            .into_iter()
            .map(|(key, value)| (key.clone(), sorted_value(value)))
            .collect(),
    )
}

fn sorted_value(value: &Value) -> Value {
    match value {
        Value::Object(object) => sorted_object(object),
        Value::Array(values) => Value::Array(values.iter().map(sorted_value).collect()),
        other => other.clone(),
    }
}

fn put_bytes(object: &mut Map<String, Value>, key: &str, bytes: Option<&[u8]>) {
    if let Some(bytes) = bytes {
        object.insert(key.to_string(), Value::String(encode_b64(bytes)));
    }
}
