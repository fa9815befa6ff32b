//! JOSE objects and their translation to and from IPLD
//!
//! - **[`Jose::parse`]**: JSON text (flattened or general serialization) into a [`Jose`]
//! - **[`Jose::to_node`]**: a [`Jose`] into a canonical [`Ipld`](crate::linked_data::Ipld) tree
//! - **[`Jose::from_node`]**: the inverse, from an IPLD tree back to a [`Jose`]
//! - **[`Jose::to_canonical_json`]**: always the general serialization, keys sorted
//!
//! # Shape
//!
//! Flattened serializations are normalized as soon as they are parsed, so a
//!  [`Jws`] always carries a non-empty list of [`Signature`]s and a [`Jwe`]
//!  a non-empty list of [`Recipient`]s. Nothing downstream special cases
//!  the single entry form.
//!
//! Binary members (`payload`, `protected`, `signature`, `encrypted_key`,
//!  `aad`, `iv`, `ciphertext`, `tag`) are held as raw decoded bytes. The
//!  `protected` header in particular is never re-parsed, its exact bytes
//!  are what signatures and AEAD tags cover.
//!
//! # Optional members
//!
//! A member that was not provided is `None` and has no key in the node tree.
//!  A member that was provided as an empty string is `Some(vec![])` and is
//!  kept as empty bytes. JSON `null` is treated as not provided.

use std::fmt;

pub(crate) mod json;
mod node;
mod parse;

/// Unprotected JOSE header, a plain JSON object.
pub type Header = serde_json::Map<String, serde_json::Value>;

/// Where in the pipeline an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// JSON text to [`Jose`]
    Parse,
    /// IPLD node to [`Jose`]
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => write!(f, "parse"),
            Stage::Decode => write!(f, "decode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoseError {
    #[error("{0}: {1}")]
    Decode(Stage, String),
    #[error("{0}: missing field `{1}`")]
    MissingField(Stage, &'static str),
    #[error("{0}: unknown variant, expected a `payload` or `ciphertext` member")]
    UnknownVariant(Stage),
}

/// A JOSE object, either signed or encrypted.
#[derive(Debug, Clone, PartialEq)]
pub enum Jose {
    Jws(Jws),
    Jwe(Jwe),
}

/// JSON Web Signature (RFC 7515), general serialization shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Jws {
    /// `None` means the payload is detached
    pub payload: Option<Vec<u8>>,
    /// Never empty
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub protected: Option<Vec<u8>>,
    pub header: Option<Header>,
    pub signature: Vec<u8>,
}

/// JSON Web Encryption (RFC 7516), general serialization shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Jwe {
    pub protected: Option<Vec<u8>>,
    pub unprotected: Option<Header>,
    /// Never empty. A flattened JWE without `header` or `encrypted_key`
    ///  still has one recipient, with both members absent.
    pub recipients: Vec<Recipient>,
    pub aad: Option<Vec<u8>>,
    pub iv: Option<Vec<u8>>,
    pub ciphertext: Vec<u8>,
    pub tag: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub header: Option<Header>,
    pub encrypted_key: Option<Vec<u8>>,
}

impl Jose {
    pub fn is_jws(&self) -> bool {
        matches!(self, Jose::Jws(_))
    }

    pub fn is_jwe(&self) -> bool {
        matches!(self, Jose::Jwe(_))
    }

    pub fn as_jws(&self) -> Option<&Jws> {
        match self {
            Jose::Jws(jws) => Some(jws),
            Jose::Jwe(_) => None,
        }
    }

    pub fn as_jwe(&self) -> Option<&Jwe> {
        match self {
            Jose::Jwe(jwe) => Some(jwe),
            Jose::Jws(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Jose::Jws(_) => "jws",
            Jose::Jwe(_) => "jwe",
        }
    }
}

impl From<Jws> for Jose {
    fn from(jws: Jws) -> Self {
        Jose::Jws(jws)
    }
}

impl From<Jwe> for Jose {
    fn from(jwe: Jwe) -> Self {
        Jose::Jwe(jwe)
    }
}
