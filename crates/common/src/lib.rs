/**
 * Content addressing for JOSE nodes.
 *  Canonical DAG-CBOR bytes in, CIDv1 tagged
 *  with the DAG-JOSE codec out, and back.
 */
pub mod address;
/**
 * JOSE objects (JWS and JWE): parsing the JSON
 *  serializations, translating to and from IPLD
 *  nodes, and writing canonical JSON.
 */
pub mod jose;
/**
 * Internal wrapper around IPLD, renamed to
 *  something a little more down-to-earth.
 * Handles CIDs, multihashes, blocks and the
 *  DAG-CBOR codec.
 */
pub mod linked_data;
/**
 * Debug rendering of node trees.
 */
pub mod pretty;
/**
 * Codec routing for stored blocks, and ingest
 *  of user input in its supported encodings.
 */
pub mod registry;

pub mod prelude {
    pub use crate::address::AddressError;
    pub use crate::jose::{Header, Jose, JoseError, Jwe, Jws, Recipient, Signature, Stage};
    pub use crate::linked_data::hash::{HashFunction, NATIVE_HASH_LENGTH, UNSPECIFIED_HASH};
    pub use crate::linked_data::{multibase, Block, Cid, CidError, Ipld, DAG_JOSE_CODEC};
    pub use crate::registry::{ingest, CodecRegistry, DecodedBlock, InputEncoding, RegistryError};
}
