//! Routing between codecs, blocks and input encodings.
//!
//! A [`CodecRegistry`] is built once at startup and never changes after
//!  that; pass it by reference to whatever needs to route a block by its
//!  codec. [`ingest`] is the other direction, turning user input in one of
//!  the supported [`InputEncoding`]s into an addressed block.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::address::{self, AddressError};
use crate::jose::{Jose, JoseError};
use crate::linked_data::hash::HashError;
use crate::linked_data::{Block, BlockEncoded, Cid, CodecError, Ipld, DAG_JOSE_CODEC};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no decoder registered for codec {0:#x}")]
    UnknownCodec(u64),
    #[error("unknown input encoding: {0}")]
    UnknownInputEncoding(String),
    #[error("block data does not match {0}")]
    DigestMismatch(Cid),
    #[error(transparent)]
    Jose(#[from] JoseError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// A block along with the node tree and JOSE object it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBlock {
    pub block: Block,
    pub node: Ipld,
    pub jose: Jose,
}

impl DecodedBlock {
    pub fn cid(&self) -> &Cid {
        self.block.cid()
    }
}

pub type BlockDecoder = fn(&Block) -> Result<DecodedBlock, RegistryError>;

/// Immutable codec -> decoder table
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    decoders: HashMap<u64, BlockDecoder>,
}

#[derive(Debug, Default)]
pub struct CodecRegistryBuilder {
    decoders: HashMap<u64, BlockDecoder>,
}

impl CodecRegistryBuilder {
    pub fn register(mut self, codec: u64, decoder: BlockDecoder) -> Self {
        self.decoders.insert(codec, decoder);
        self
    }

    pub fn build(self) -> CodecRegistry {
        CodecRegistry {
            decoders: self.decoders,
        }
    }
}

impl Default for CodecRegistry {
    /// A registry that knows about DAG-JOSE
    fn default() -> Self {
        Self::builder()
            .register(DAG_JOSE_CODEC, decode_dag_jose)
            .build()
    }
}

impl CodecRegistry {
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    pub fn decoder(&self, codec: u64) -> Option<BlockDecoder> {
        self.decoders.get(&codec).copied()
    }

    pub fn codecs(&self) -> impl Iterator<Item = u64> + '_ {
        self.decoders.keys().copied()
    }

    /// Decode `block` with whatever decoder is registered for its CID's codec.
    pub fn decode(&self, block: &Block) -> Result<DecodedBlock, RegistryError> {
        let codec = block.cid().codec();
        let decoder = self
            .decoder(codec)
            .ok_or(RegistryError::UnknownCodec(codec))?;
        decoder(block)
    }
}

/// The DAG-JOSE block decoder: DAG-CBOR bytes to a node tree, checked to
///  actually hold a JOSE object.
pub fn decode_dag_jose(block: &Block) -> Result<DecodedBlock, RegistryError> {
    let node = address::decode(block)?;
    let jose = Jose::from_node(&node)?;
    Ok(DecodedBlock {
        block: block.clone(),
        node,
        jose,
    })
}

/// Textual/binary forms users can hand us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEncoding {
    /// JOSE JSON serialization
    Json,
    /// DAG-CBOR bytes
    Cbor,
    /// Same as [`InputEncoding::Cbor`]
    Raw,
}

impl InputEncoding {
    pub const ALL: [InputEncoding; 3] = [InputEncoding::Json, InputEncoding::Cbor, InputEncoding::Raw];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputEncoding::Json => "json",
            InputEncoding::Cbor => "cbor",
            InputEncoding::Raw => "raw",
        }
    }
}

impl fmt::Display for InputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputEncoding {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(InputEncoding::Json),
            "cbor" => Ok(InputEncoding::Cbor),
            "raw" => Ok(InputEncoding::Raw),
            other => Err(RegistryError::UnknownInputEncoding(other.to_string())),
        }
    }
}

/// Turn `input` into an addressed DAG-JOSE block.
///
/// DAG-CBOR input is round tripped through [`Jose`] before it is encoded,
///  so a block ingested from CBOR gets the same CID as the same object
///  ingested from JSON.
pub fn ingest(
    encoding: InputEncoding,
    input: &[u8],
    hash: u64,
    length: i32,
) -> Result<DecodedBlock, RegistryError> {
    let jose = match encoding {
        InputEncoding::Json => Jose::parse(input)?,
        InputEncoding::Cbor | InputEncoding::Raw => Jose::from_node(&Ipld::decode(input)?)?,
    };
    let node = jose.to_node();
    let block = address::encode(&node, hash, length)?;

    tracing::info!(cid = %block.cid(), encoding = %encoding, kind = jose.kind(), "ingested JOSE object");
    tracing::trace!(node = %crate::pretty::Pretty(&node), "canonical node");

    Ok(DecodedBlock { block, node, jose })
}

/// Pair `data` with an expected CID, checking the digest before decoding.
pub fn decode_verified(
    registry: &CodecRegistry,
    cid: Cid,
    data: Vec<u8>,
) -> Result<DecodedBlock, RegistryError> {
    let block = Block::new(cid, data);
    if !block.verify()? {
        return Err(RegistryError::DigestMismatch(cid));
    }
    registry.decode(&block)
}
