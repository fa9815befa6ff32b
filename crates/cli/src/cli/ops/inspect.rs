use std::path::PathBuf;

use clap::Args;

use common::linked_data::{BlockEncoded, CodecError, Ipld};
use common::pretty;

use crate::cli::op::{read_input, Op, OpContext};

/// Print the node tree held in a block, whether or not it is valid JOSE
#[derive(Args, Debug, Clone)]
pub struct Inspect {
    /// File holding the block bytes; reads stdin when `-`
    pub block: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[async_trait::async_trait]
impl Op for Inspect {
    type Error = InspectError;
    type Output = String;

    async fn execute(&self, _ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let data = read_input(Some(self.block.as_path())).await?;
        let node = Ipld::decode(&data)?;
        Ok(pretty::to_string(&node))
    }
}
