use crate::utils;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use cri_usm::{ChunkSignature, ChunkWalker, PayloadType};
use std::{collections::BTreeMap, fs::File, io::BufReader, path::PathBuf};

/// List the streams of a USM file by walking its chunks.
#[derive(Debug, Clone, Args)]
pub struct Probe {
    /// Path of the USM file.
    #[arg(required = true)]
    input: PathBuf,
}

#[derive(Default)]
struct StreamStats {
    chunks: BTreeMap<PayloadType, usize>,
    payload_bytes: u64,
    pages: usize,
}

impl Probe {
    pub fn execute(self) -> Result<()> {
        if !utils::is_usm_file(&self.input)? {
            bail!("{} is not a USM file.", self.input.display());
        }

        let mut streams: BTreeMap<(ChunkSignature, u8), StreamStats> = BTreeMap::new();
        let mut total = 0;

        for chunk in ChunkWalker::new(BufReader::new(File::open(&self.input)?))? {
            let chunk = chunk?;
            let stats = streams
                .entry((chunk.header.signature, chunk.header.channel))
                .or_default();

            *stats.chunks.entry(chunk.header.payload_type).or_default() += 1;
            stats.payload_bytes += chunk.payload.len() as u64;

            if chunk.is_metadata_page() {
                stats.pages += 1;
            }

            total += 1;
        }

        println!(
            "{} {} ({} chunks)",
            "File".bold().green(),
            self.input.display(),
            total
        );

        for ((signature, channel), stats) in &streams {
            let chunks = stats
                .chunks
                .iter()
                .map(|(kind, count)| format!("{} {}", count, kind))
                .collect::<Vec<_>>()
                .join(", ");

            println!(
                "  {} #{} {} | {} | {} metadata page(s)",
                signature.to_string().bold().cyan(),
                channel,
                utils::format_bytes(stats.payload_bytes),
                chunks,
                stats.pages,
            );
        }

        Ok(())
    }
}
