use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::linked_data::Ipld;

use super::{Header, Jose, JoseError, Jwe, Jws, Recipient, Signature, Stage};

type IpldMap = BTreeMap<String, Ipld>;

const JWS_FIELDS: &[&str] = &["payload", "signatures"];
const SIGNATURE_FIELDS: &[&str] = &["protected", "header", "signature"];
const JWE_FIELDS: &[&str] = &[
    "protected",
    "unprotected",
    "recipients",
    "aad",
    "iv",
    "ciphertext",
    "tag",
];
const RECIPIENT_FIELDS: &[&str] = &["header", "encrypted_key"];

impl Jose {
    /// Build the IPLD tree for this object.
    ///
    /// Absent members are left out of the map entirely rather than written
    ///  as null, so "not provided" and "null" can never hash differently.
    ///  Key order is the codec's business, not ours.
    pub fn to_node(&self) -> Ipld {
        match self {
            Jose::Jws(jws) => jws_to_node(jws),
            Jose::Jwe(jwe) => jwe_to_node(jwe),
        }
    }

    /// Read a JOSE object back out of an IPLD tree.
    ///
    /// A `ciphertext` key means a [`Jwe`]; a `payload` or `signatures` key
    ///  means a [`Jws`] (the payload may be detached). Keys outside the
    ///  chosen variant's members are rejected, at the root and in every
    ///  signature or recipient entry.
    pub fn from_node(node: &Ipld) -> Result<Self, JoseError> {
        let Ipld::Map(map) = node else {
            return Err(decode_error("root node must be a map".to_string()));
        };

        let jose = if entry(map, "ciphertext").is_some() {
            Jose::Jwe(jwe_from_node(map)?)
        } else if entry(map, "payload").is_some() || entry(map, "signatures").is_some() {
            Jose::Jws(jws_from_node(map)?)
        } else {
            return Err(JoseError::UnknownVariant(Stage::Decode));
        };

        tracing::debug!(kind = jose.kind(), "decoded JOSE object from node");
        Ok(jose)
    }
}

fn jws_to_node(jws: &Jws) -> Ipld {
    let mut map = IpldMap::new();
    put_bytes(&mut map, "payload", jws.payload.as_ref());
    map.insert(
        "signatures".to_string(),
        Ipld::List(jws.signatures.iter().map(signature_to_node).collect()),
    );
    Ipld::Map(map)
}

fn signature_to_node(signature: &Signature) -> Ipld {
    let mut map = IpldMap::new();
    put_bytes(&mut map, "protected", signature.protected.as_ref());
    put_header(&mut map, "header", signature.header.as_ref());
    put_bytes(&mut map, "signature", Some(&signature.signature));
    Ipld::Map(map)
}

fn jwe_to_node(jwe: &Jwe) -> Ipld {
    let mut map = IpldMap::new();
    put_bytes(&mut map, "protected", jwe.protected.as_ref());
    put_header(&mut map, "unprotected", jwe.unprotected.as_ref());
    map.insert(
        "recipients".to_string(),
        Ipld::List(jwe.recipients.iter().map(recipient_to_node).collect()),
    );
    put_bytes(&mut map, "aad", jwe.aad.as_ref());
    put_bytes(&mut map, "iv", jwe.iv.as_ref());
    put_bytes(&mut map, "ciphertext", Some(&jwe.ciphertext));
    put_bytes(&mut map, "tag", jwe.tag.as_ref());
    Ipld::Map(map)
}

fn recipient_to_node(recipient: &Recipient) -> Ipld {
    let mut map = IpldMap::new();
    put_header(&mut map, "header", recipient.header.as_ref());
    put_bytes(&mut map, "encrypted_key", recipient.encrypted_key.as_ref());
    Ipld::Map(map)
}

fn put_bytes(map: &mut IpldMap, key: &str, bytes: Option<&Vec<u8>>) {
    if let Some(bytes) = bytes {
        map.insert(key.to_string(), Ipld::Bytes(bytes.clone()));
    }
}

fn put_header(map: &mut IpldMap, key: &str, header: Option<&Header>) {
    if let Some(header) = header {
        map.insert(key.to_string(), header_to_node(header));
    }
}

fn header_to_node(header: &Header) -> Ipld {
    Ipld::Map(
        header
            .iter()
            .map(|(key, value)| (key.clone(), json_to_node(value)))
            .collect(),
    )
}

fn json_to_node(value: &Value) -> Ipld {
    match value {
        Value::Null => Ipld::Null,
        Value::Bool(b) => Ipld::Bool(*b),
        Value::Number(n) => number_to_node(n),
        Value::String(s) => Ipld::String(s.clone()),
        Value::Array(values) => Ipld::List(values.iter().map(json_to_node).collect()),
        Value::Object(object) => header_to_node(object),
    }
}

fn number_to_node(n: &Number) -> Ipld {
    if let Some(i) = n.as_i64() {
        Ipld::Integer(i.into())
    } else if let Some(u) = n.as_u64() {
        Ipld::Integer(u.into())
    } else {
        // every other JSON number is representable as f64
        Ipld::Float(n.as_f64().unwrap_or_default())
    }
}

fn jws_from_node(map: &IpldMap) -> Result<Jws, JoseError> {
    known_fields(map, JWS_FIELDS)?;
    let entries = list(map, "signatures")?.ok_or(missing("signatures"))?;
    if entries.is_empty() {
        return Err(missing("signatures"));
    }
    let signatures = entries
        .iter()
        .map(|entry| signature_from_node(entry_map(entry, "signatures")?))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Jws {
        payload: bytes(map, "payload")?,
        signatures,
    })
}

fn signature_from_node(map: &IpldMap) -> Result<Signature, JoseError> {
    known_fields(map, SIGNATURE_FIELDS)?;
    Ok(Signature {
        protected: bytes(map, "protected")?,
        header: header(map, "header")?,
        signature: bytes(map, "signature")?.ok_or(missing("signature"))?,
    })
}

fn jwe_from_node(map: &IpldMap) -> Result<Jwe, JoseError> {
    known_fields(map, JWE_FIELDS)?;
    let entries = list(map, "recipients")?.ok_or(missing("recipients"))?;
    if entries.is_empty() {
        return Err(missing("recipients"));
    }
    let recipients = entries
        .iter()
        .map(|entry| recipient_from_node(entry_map(entry, "recipients")?))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Jwe {
        protected: bytes(map, "protected")?,
        unprotected: header(map, "unprotected")?,
        recipients,
        aad: bytes(map, "aad")?,
        iv: bytes(map, "iv")?,
        ciphertext: bytes(map, "ciphertext")?.ok_or(missing("ciphertext"))?,
        tag: bytes(map, "tag")?,
    })
}

fn recipient_from_node(map: &IpldMap) -> Result<Recipient, JoseError> {
    known_fields(map, RECIPIENT_FIELDS)?;
    Ok(Recipient {
        header: header(map, "header")?,
        encrypted_key: bytes(map, "encrypted_key")?,
    })
}

fn known_fields(map: &IpldMap, fields: &[&str]) -> Result<(), JoseError> {
    match map.keys().find(|key| !fields.contains(&key.as_str())) {
        Some(key) => Err(decode_error(format!("unexpected field `{key}`"))),
        None => Ok(()),
    }
}

fn entry<'a>(map: &'a IpldMap, key: &str) -> Option<&'a Ipld> {
    map.get(key).filter(|node| !matches!(node, Ipld::Null))
}

fn bytes(map: &IpldMap, key: &'static str) -> Result<Option<Vec<u8>>, JoseError> {
    match entry(map, key) {
        None => Ok(None),
        Some(Ipld::Bytes(bytes)) => Ok(Some(bytes.clone())),
        Some(_) => Err(decode_error(format!("field `{key}` must be bytes"))),
    }
}

fn list<'a>(map: &'a IpldMap, key: &'static str) -> Result<Option<&'a [Ipld]>, JoseError> {
    match entry(map, key) {
        None => Ok(None),
        Some(Ipld::List(entries)) => Ok(Some(entries.as_slice())),
        Some(_) => Err(decode_error(format!("field `{key}` must be a list"))),
    }
}

fn entry_map<'a>(node: &'a Ipld, key: &'static str) -> Result<&'a IpldMap, JoseError> {
    match node {
        Ipld::Map(map) => Ok(map),
        _ => Err(decode_error(format!("entries of `{key}` must be maps"))),
    }
}

fn header(map: &IpldMap, key: &'static str) -> Result<Option<Header>, JoseError> {
    match entry(map, key) {
        None => Ok(None),
        Some(Ipld::Map(members)) => members
            .iter()
            .map(|(name, node)| Ok((name.clone(), node_to_json(node, key)?)))
            .collect::<Result<Header, JoseError>>()
            .map(Some),
        Some(_) => Err(decode_error(format!("field `{key}` must be a map"))),
    }
}

// headers are plain JSON, so only JSON-shaped nodes are allowed in them
fn node_to_json(node: &Ipld, key: &'static str) -> Result<Value, JoseError> {
    match node {
        Ipld::Null => Ok(Value::Null),
        Ipld::Bool(b) => Ok(Value::Bool(*b)),
        Ipld::Integer(i) => i64::try_from(*i)
            .map(Value::from)
            .or_else(|_| u64::try_from(*i).map(Value::from))
            .map_err(|_| decode_error(format!("integer in `{key}` is out of range"))),
        Ipld::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| decode_error(format!("non-finite float in `{key}`"))),
        Ipld::String(s) => Ok(Value::String(s.clone())),
        Ipld::List(nodes) => nodes
            .iter()
            .map(|node| node_to_json(node, key))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Ipld::Map(members) => members
            .iter()
            .map(|(name, node)| Ok((name.clone(), node_to_json(node, key)?)))
            .collect::<Result<Header, JoseError>>()
            .map(Value::Object),
        Ipld::Bytes(_) | Ipld::Link(_) => Err(decode_error(format!(
            "`{key}` may only contain JSON values"
        ))),
    }
}

fn decode_error(reason: String) -> JoseError {
    JoseError::Decode(Stage::Decode, reason)
}

fn missing(field: &'static str) -> JoseError {
    JoseError::MissingField(Stage::Decode, field)
}
