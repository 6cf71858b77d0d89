use super::crypt::CryptArgs;
use anyhow::Result;
use clap::Args;
use cri_usm::crypt::OpMode;

/// Encrypt the video and audio packets of USM files.
#[derive(Debug, Clone, Args)]
pub struct Encrypt {
    #[command(flatten)]
    args: CryptArgs,
}

impl Encrypt {
    pub fn execute(self) -> Result<()> {
        self.args.run(OpMode::Encrypt)
    }
}
