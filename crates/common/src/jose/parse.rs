use serde_json::{Map, Value};

use super::json::decode_b64;
use super::{Header, Jose, JoseError, Jwe, Jws, Recipient, Signature, Stage};

type Object = Map<String, Value>;

impl Jose {
    /// Parse a JOSE object from its JSON serialization.
    ///
    /// Both the general and the flattened serializations are accepted and
    ///  normalized into the same shape. The variant is picked by member
    ///  presence: `payload` means a [`Jws`], otherwise `ciphertext` means a
    ///  [`Jwe`], otherwise the input is rejected.
    pub fn parse(input: &[u8]) -> Result<Self, JoseError> {
        let object: Object = serde_json::from_slice(input)
            .map_err(|e| JoseError::Decode(Stage::Parse, format!("malformed JSON object: {e}")))?;

        let jose = if member(&object, "payload").is_some() {
            Jose::Jws(parse_jws(&object)?)
        } else if member(&object, "ciphertext").is_some() {
            Jose::Jwe(parse_jwe(&object)?)
        } else {
            return Err(JoseError::UnknownVariant(Stage::Parse));
        };

        tracing::debug!(kind = jose.kind(), "parsed JOSE object");
        Ok(jose)
    }
}

fn parse_jws(object: &Object) -> Result<Jws, JoseError> {
    let signatures = match array(object, "signatures")? {
        Some(entries) => {
            if member(object, "signature").is_some() {
                return Err(JoseError::Decode(
                    Stage::Parse,
                    "both `signatures` and a flattened `signature` are present".to_string(),
                ));
            }
            if entries.is_empty() {
                return Err(JoseError::MissingField(Stage::Parse, "signatures"));
            }
            entries
                .iter()
                .map(|entry| parse_signature(entry_object(entry, "signatures")?))
                .collect::<Result<Vec<_>, _>>()?
        }
        // flattened
        None => vec![parse_signature(object)?],
    };

    Ok(Jws {
        payload: bytes(object, "payload")?,
        signatures,
    })
}

fn parse_signature(object: &Object) -> Result<Signature, JoseError> {
    Ok(Signature {
        protected: bytes(object, "protected")?,
        header: header(object, "header")?,
        signature: required_bytes(object, "signature")?,
    })
}

fn parse_jwe(object: &Object) -> Result<Jwe, JoseError> {
    let recipients = match array(object, "recipients")? {
        Some(entries) => {
            if member(object, "encrypted_key").is_some() || member(object, "header").is_some() {
                return Err(JoseError::Decode(
                    Stage::Parse,
                    "both `recipients` and a flattened `header` or `encrypted_key` are present"
                        .to_string(),
                ));
            }
            if entries.is_empty() {
                return Err(JoseError::MissingField(Stage::Parse, "recipients"));
            }
            entries
                .iter()
                .map(|entry| parse_recipient(entry_object(entry, "recipients")?))
                .collect::<Result<Vec<_>, _>>()?
        }
        // flattened, possibly with no per-recipient members at all
        None => vec![parse_recipient(object)?],
    };

    Ok(Jwe {
        protected: bytes(object, "protected")?,
        unprotected: header(object, "unprotected")?,
        recipients,
        aad: bytes(object, "aad")?,
        iv: bytes(object, "iv")?,
        ciphertext: required_bytes(object, "ciphertext")?,
        tag: bytes(object, "tag")?,
    })
}

fn parse_recipient(object: &Object) -> Result<Recipient, JoseError> {
    Ok(Recipient {
        header: header(object, "header")?,
        encrypted_key: bytes(object, "encrypted_key")?,
    })
}

// null counts as absent
fn member<'a>(object: &'a Object, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

fn bytes(object: &Object, name: &'static str) -> Result<Option<Vec<u8>>, JoseError> {
    match member(object, name) {
        None => Ok(None),
        Some(Value::String(text)) => decode_b64(text).map(Some).map_err(|e| {
            JoseError::Decode(
                Stage::Parse,
                format!("field `{name}` is not unpadded base64url: {e}"),
            )
        }),
        Some(_) => Err(JoseError::Decode(
            Stage::Parse,
            format!("field `{name}` must be a string"),
        )),
    }
}

fn required_bytes(object: &Object, name: &'static str) -> Result<Vec<u8>, JoseError> {
    bytes(object, name)?.ok_or(JoseError::MissingField(Stage::Parse, name))
}

fn header(object: &Object, name: &'static str) -> Result<Option<Header>, JoseError> {
    match member(object, name) {
        None => Ok(None),
        Some(Value::Object(header)) => Ok(Some(header.clone())),
        Some(_) => Err(JoseError::Decode(
            Stage::Parse,
            format!("field `{name}` must be a JSON object"),
        )),
    }
}

fn array<'a>(object: &'a Object, name: &'static str) -> Result<Option<&'a Vec<Value>>, JoseError> {
    match member(object, name) {
        None => Ok(None),
        Some(Value::Array(entries)) => Ok(Some(entries)),
        Some(_) => Err(JoseError::Decode(
            Stage::Parse,
            format!("field `{name}` must be an array"),
        )),
    }
}

fn entry_object<'a>(entry: &'a Value, name: &'static str) -> Result<&'a Object, JoseError> {
    entry.as_object().ok_or_else(|| {
        JoseError::Decode(
            Stage::Parse,
            format!("entries of `{name}` must be JSON objects"),
        )
    })
}
