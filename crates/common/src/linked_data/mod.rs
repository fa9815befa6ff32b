//! Thin wrapper around the IPLD stack.
//!
//! Everything that touches DAG-CBOR, CIDs or multihashes goes through here so the
//! rest of the crate only ever sees [`Ipld`], [`Cid`] and [`Block`].

use serde::{de::DeserializeOwned, Serialize};

mod block;
pub mod hash;

pub use block::Block;
pub use cid::multibase;
pub use cid::{Cid, Error as CidError, Version as CidVersion};
pub use ipld_core::ipld::Ipld;
pub use multihash::Multihash;

/// Multicodec code for DAG-JOSE.
/// Tags every block this crate produces, and is how a reader routes
///  bytes back to this transcoder rather than some other codec.
pub const DAG_JOSE_CODEC: u64 = 0x85;
/// Multicodec code for plain DAG-CBOR
pub const DAG_CBOR_CODEC: u64 = 0x71;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode DAG-CBOR: {0}")]
    Encode(String),
    #[error("failed to decode DAG-CBOR: {0}")]
    Decode(String),
}

/// A binary codec that can turn serde types into bytes and back.
pub trait BlockCodec {
    const CODE: u64;

    fn encode<T: Serialize>(data: &T) -> Result<Vec<u8>, CodecError>;
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError>;
}

/// DAG-CBOR, backed by `serde_ipld_dagcbor`.
///  Map keys are always emitted in canonical order, so equal
///  trees always produce equal bytes.
#[derive(Debug, Clone, Copy)]
pub struct DagCborCodec;

impl BlockCodec for DagCborCodec {
    const CODE: u64 = DAG_CBOR_CODEC;

    fn encode<T: Serialize>(data: &T) -> Result<Vec<u8>, CodecError> {
        serde_ipld_dagcbor::to_vec(data).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
        serde_ipld_dagcbor::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Anything that can be written to (and read back from) a block
///  with a given codec.
pub trait BlockEncoded<C: BlockCodec>: Serialize + DeserializeOwned {
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        C::encode(self)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        C::decode(bytes)
    }
}

impl BlockEncoded<DagCborCodec> for Ipld {}
