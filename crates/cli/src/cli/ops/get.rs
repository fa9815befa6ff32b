use std::path::PathBuf;

use clap::Args;

use common::linked_data::{BlockEncoded, CodecError};
use common::prelude::{Cid, Ipld, Jose, JoseError, RegistryError};
use common::registry::decode_verified;

use crate::cli::op::{read_input, Op, OpContext};

#[derive(Args, Debug, Clone)]
pub struct Get {
    /// File holding the block bytes; reads stdin when `-`
    pub block: PathBuf,

    /// Expected CID; when given the digest is checked and
    ///  decoding is routed by the CID's codec
    #[arg(long)]
    pub cid: Option<Cid>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Jose(#[from] JoseError),
}

#[async_trait::async_trait]
impl Op for Get {
    type Error = GetError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let data = read_input(Some(self.block.as_path())).await?;

        let jose = match self.cid {
            Some(cid) => decode_verified(&ctx.registry, cid, data)?.jose,
            None => Jose::from_node(&Ipld::decode(&data)?)?,
        };

        Ok(jose.to_canonical_json_string())
    }
}

#[cfg(test)]
mod tests {
    use common::prelude::{ingest, InputEncoding, NATIVE_HASH_LENGTH, UNSPECIFIED_HASH};
    use tempfile::TempDir;

    use super::*;
    use crate::config::Config;

    const FLATTENED: &str = r#"{"signature":"AQIDBAUGBwgJCgsM","payload":"eyJ0ZXN0IjoxfQ"}"#;
    const CANONICAL: &str = r#"{"payload":"eyJ0ZXN0IjoxfQ","signatures":[{"signature":"AQIDBAUGBwgJCgsM"}]}"#;

    async fn stored_block(temp: &TempDir) -> (Cid, PathBuf) {
        let stored = ingest(
            InputEncoding::Json,
            FLATTENED.as_bytes(),
            UNSPECIFIED_HASH,
            NATIVE_HASH_LENGTH,
        )
        .unwrap();
        let path = temp.path().join("block.bin");
        tokio::fs::write(&path, stored.block.data()).await.unwrap();
        (*stored.cid(), path)
    }

    #[tokio::test]
    async fn test_get_canonical_json() {
        let temp = TempDir::new().unwrap();
        let (cid, path) = stored_block(&temp).await;
        let ctx = OpContext::new(Config::default());

        let without_cid = Get {
            block: path.clone(),
            cid: None,
        };
        assert_eq!(without_cid.execute(&ctx).await.unwrap(), CANONICAL);

        let with_cid = Get {
            block: path,
            cid: Some(cid),
        };
        assert_eq!(with_cid.execute(&ctx).await.unwrap(), CANONICAL);
    }

    #[tokio::test]
    async fn test_get_wrong_cid() {
        let temp = TempDir::new().unwrap();
        let (_, path) = stored_block(&temp).await;
        let other = ingest(
            InputEncoding::Json,
            br#"{"ciphertext":"AA"}"#,
            UNSPECIFIED_HASH,
            NATIVE_HASH_LENGTH,
        )
        .unwrap();

        let ctx = OpContext::new(Config::default());
        let op = Get {
            block: path,
            cid: Some(*other.cid()),
        };
        assert!(matches!(
            op.execute(&ctx).await,
            Err(GetError::Registry(RegistryError::DigestMismatch(_)))
        ));
    }
}
