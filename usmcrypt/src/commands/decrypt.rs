use super::crypt::CryptArgs;
use anyhow::Result;
use clap::Args;
use cri_usm::crypt::OpMode;

/// Decrypt the video and audio packets of USM files.
#[derive(Debug, Clone, Args)]
pub struct Decrypt {
    #[command(flatten)]
    args: CryptArgs,
}

impl Decrypt {
    pub fn execute(self) -> Result<()> {
        self.args.run(OpMode::Decrypt)
    }
}
