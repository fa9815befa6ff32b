use super::hash::{HashError, HashFunction};
use super::Cid;

/// An immutable pairing of a content identifier and the bytes it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Vec<u8>,
}

impl Block {
    /// Pair bytes with a CID. The digest is not checked here;
    ///  call [`Block::verify`] when the pairing comes from an untrusted source.
    pub fn new(cid: Cid, data: Vec<u8>) -> Self {
        Self { cid, data }
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (Cid, Vec<u8>) {
        (self.cid, self.data)
    }

    /// Re-hash the data with the CID's own hash function and digest
    ///  length, returning whether it matches.
    pub fn verify(&self) -> Result<bool, HashError> {
        let expected = self.cid.hash();
        let function = HashFunction::from_code(expected.code())?;
        let actual = function.sum(&self.data, i32::from(expected.size()))?;
        Ok(&actual == expected)
    }
}
