//! Content addressing for DAG-JOSE nodes.
//!
//! [`encode`] turns a node tree into a [`Block`]: canonical DAG-CBOR bytes
//!  plus a CIDv1 tagged with [`DAG_JOSE_CODEC`]. [`decode`] is the inverse
//!  for the bytes half of a block.

use crate::linked_data::hash::{self, HashError};
use crate::linked_data::{Block, BlockEncoded, Cid, CodecError, Ipld, DAG_JOSE_CODEC};

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("address: {0}")]
    Hash(#[from] HashError),
    #[error("address: {0}")]
    Codec(#[from] CodecError),
}

/// Encode `node` and derive its content identifier.
///
/// `hash` is a multihash code, [`hash::UNSPECIFIED_HASH`] selects SHA2-256.
///  `length` is the digest length in bytes, [`hash::NATIVE_HASH_LENGTH`]
///  (`-1`) selects the function's native size.
pub fn encode(node: &Ipld, hash: u64, length: i32) -> Result<Block, AddressError> {
    let data = node.encode()?;
    let multihash = hash::sum(&data, hash, length)?;
    let cid = Cid::new_v1(DAG_JOSE_CODEC, multihash);

    tracing::debug!(%cid, size = data.len(), "encoded dag-jose block");
    Ok(Block::new(cid, data))
}

/// Decode the bytes of `block` back into a node tree.
pub fn decode(block: &Block) -> Result<Ipld, AddressError> {
    let node = Ipld::decode(block.data())?;
    tracing::trace!(cid = %block.cid(), "decoded dag-jose block");
    Ok(node)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::linked_data::hash::{NATIVE_HASH_LENGTH, UNSPECIFIED_HASH};
    use crate::linked_data::CidVersion;

    fn node() -> Ipld {
        Ipld::Map(BTreeMap::from([
            ("payload".to_string(), Ipld::Bytes(b"hello".to_vec())),
            (
                "signatures".to_string(),
                Ipld::List(vec![Ipld::Map(BTreeMap::from([(
                    "signature".to_string(),
                    Ipld::Bytes(vec![1, 2, 3]),
                )]))]),
            ),
        ]))
    }

    #[test]
    fn test_encode_defaults() {
        let block = encode(&node(), UNSPECIFIED_HASH, NATIVE_HASH_LENGTH).unwrap();

        assert_eq!(block.cid().version(), CidVersion::V1);
        assert_eq!(block.cid().codec(), DAG_JOSE_CODEC);
        assert_eq!(block.cid().hash().code(), 0x12);
        assert_eq!(block.cid().hash().size(), 32);
        assert!(block.verify().unwrap());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = encode(&node(), 0x12, NATIVE_HASH_LENGTH).unwrap();
        let b = encode(&node(), 0x12, NATIVE_HASH_LENGTH).unwrap();
        assert_eq!(a.cid(), b.cid());
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_hash_function_changes_cid() {
        let sha = encode(&node(), 0x12, NATIVE_HASH_LENGTH).unwrap();
        let blake = encode(&node(), 0x1e, NATIVE_HASH_LENGTH).unwrap();
        assert_eq!(sha.data(), blake.data());
        assert_ne!(sha.cid(), blake.cid());
        assert_eq!(blake.cid().hash().code(), 0x1e);
    }

    #[test]
    fn test_unsupported_hash() {
        let err = encode(&node(), 0xd5, NATIVE_HASH_LENGTH).unwrap_err();
        assert!(matches!(
            err,
            AddressError::Hash(HashError::UnsupportedHashFunction(0xd5))
        ));
    }

    #[test]
    fn test_decode() {
        let block = encode(&node(), UNSPECIFIED_HASH, NATIVE_HASH_LENGTH).unwrap();
        assert_eq!(decode(&block).unwrap(), node());
    }

    #[test]
    fn test_decode_malformed() {
        let good = encode(&node(), UNSPECIFIED_HASH, NATIVE_HASH_LENGTH).unwrap();
        let block = Block::new(*good.cid(), good.data()[..good.data().len() - 2].to_vec());
        let err = decode(&block).unwrap_err();
        assert!(matches!(err, AddressError::Codec(CodecError::Decode(_))));
        assert!(err.to_string().starts_with("address: "));
    }
}
