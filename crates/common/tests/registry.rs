//! Integration tests for routing stored blocks back to JOSE objects

mod common;

use std::collections::BTreeMap;

use ::common::address;
use ::common::linked_data::BlockEncoded;
use ::common::prelude::*;
use ::common::registry::decode_verified;

use crate::common::{general_jwe, general_jws, init_tracing};

#[test]
fn test_store_and_retrieve() {
    init_tracing();
    let registry = CodecRegistry::default();

    for input in [general_jws(), general_jwe()] {
        let stored = ingest(
            InputEncoding::Json,
            input.as_bytes(),
            UNSPECIFIED_HASH,
            NATIVE_HASH_LENGTH,
        )
        .unwrap();

        // what a block store would hand back: a CID string and some bytes
        let cid_text = stored.cid().to_string();
        let data = stored.block.data().to_vec();

        let cid = Cid::try_from(cid_text.as_str()).unwrap();
        let retrieved = decode_verified(&registry, cid, data).unwrap();
        assert_eq!(retrieved.jose, stored.jose);
        assert_eq!(retrieved.node, stored.node);
    }
}

#[test]
fn test_alternate_hash_functions() {
    for function in [HashFunction::Sha2_256, HashFunction::Sha2_512, HashFunction::Blake3] {
        let stored = ingest(
            InputEncoding::Json,
            general_jws().as_bytes(),
            function.code(),
            NATIVE_HASH_LENGTH,
        )
        .unwrap();
        assert_eq!(stored.cid().hash().code(), function.code());
        assert_eq!(stored.cid().hash().size() as usize, function.native_length());
        assert!(stored.block.verify().unwrap());
    }
}

#[test]
fn test_unsupported_hash_function() {
    let err = ingest(
        InputEncoding::Json,
        general_jws().as_bytes(),
        0x1b, // keccak-256
        NATIVE_HASH_LENGTH,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::Address(_)));
    assert_eq!(
        err.to_string(),
        "address: unsupported hash function: 0x1b"
    );
}

#[test]
fn test_cbor_input_is_validated() {
    let stored = ingest(
        InputEncoding::Json,
        general_jws().as_bytes(),
        UNSPECIFIED_HASH,
        NATIVE_HASH_LENGTH,
    )
    .unwrap();

    let again = ingest(
        "cbor".parse().unwrap(),
        stored.block.data(),
        UNSPECIFIED_HASH,
        NATIVE_HASH_LENGTH,
    )
    .unwrap();
    assert_eq!(again, stored);

    let err = ingest(
        InputEncoding::Raw,
        &[0xff, 0xfe],
        UNSPECIFIED_HASH,
        NATIVE_HASH_LENGTH,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::Codec(_)));
}

#[test]
fn test_cbor_input_with_unknown_keys_is_rejected() {
    let node = Ipld::Map(BTreeMap::from([
        ("ciphertext".to_string(), Ipld::Bytes(vec![0])),
        (
            "recipients".to_string(),
            Ipld::List(vec![Ipld::Map(BTreeMap::new())]),
        ),
        ("extra".to_string(), Ipld::String("kept?".to_string())),
    ]));
    let bytes = node.encode().unwrap();

    let err = ingest(
        InputEncoding::Cbor,
        &bytes,
        UNSPECIFIED_HASH,
        NATIVE_HASH_LENGTH,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Jose(JoseError::Decode(Stage::Decode, ref msg)) if msg.contains("`extra`")
    ));

    // a stored block carrying the same node is refused on the way out too
    let block = address::encode(&node, UNSPECIFIED_HASH, NATIVE_HASH_LENGTH).unwrap();
    let (cid, data) = block.into_parts();
    assert!(matches!(
        decode_verified(&CodecRegistry::default(), cid, data),
        Err(RegistryError::Jose(JoseError::Decode(Stage::Decode, _)))
    ));
}
