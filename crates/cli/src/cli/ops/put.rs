use std::path::PathBuf;

use clap::Args;

use common::prelude::{ingest, HashFunction, InputEncoding, RegistryError};

use crate::cli::op::{read_input, Op, OpContext};

#[derive(Args, Debug, Clone)]
pub struct Put {
    /// Input file; reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Input encoding (json, cbor, raw)
    #[arg(long = "input-enc")]
    pub input_encoding: Option<InputEncoding>,

    /// Hash function (sha2-256, sha2-512, blake3)
    #[arg(long)]
    pub hash: Option<HashFunction>,

    /// Digest length in bytes, -1 for the hash function's native length
    #[arg(long, allow_hyphen_values = true)]
    pub hash_len: Option<i32>,

    /// Write the encoded block bytes to this path
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[async_trait::async_trait]
impl Op for Put {
    type Error = PutError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let encoding = self.input_encoding.unwrap_or(ctx.config.input_encoding);
        let hash = self.hash.unwrap_or(ctx.config.hash);
        let hash_len = self.hash_len.unwrap_or(ctx.config.hash_len);

        let input = read_input(self.input.as_deref()).await?;
        let stored = ingest(encoding, &input, hash.code(), hash_len)?;

        if let Some(out) = &self.out {
            tokio::fs::write(out, stored.block.data()).await?;
            tracing::info!(path = %out.display(), cid = %stored.cid(), "wrote block");
        }

        Ok(stored.cid().to_string())
    }
}
