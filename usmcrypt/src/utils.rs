use anyhow::{Result, bail};
use cri_usm::crypt::OpMode;
use log::{error, warn};
use rayon::prelude::*;
use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

pub fn format_bytes(bytes: u64) -> String {
    let mut val = bytes as f64;

    for unit in ["bytes", "KiB", "MiB", "GiB"] {
        if val < 1024.0 {
            return if unit == "bytes" {
                format!("{} {}", bytes, unit)
            } else {
                format!("{:.2} {}", val, unit)
            };
        }

        val /= 1024.0;
    }

    format!("{:.2} TiB", val)
}

pub fn is_usm_file(path: &Path) -> Result<bool> {
    let mut magic = [0u8; 4];

    match File::open(path)?.read_exact(&mut magic) {
        Ok(()) => Ok(cri_usm::chunk::is_usm(&magic)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Expand files, directories and glob patterns into USM files.
///
/// Files named directly must be USM files. Files found through a directory or
/// a pattern are skipped with a warning when they are not.
pub fn find_usm_files(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = vec![];

    for input in inputs {
        let path = Path::new(input);

        if path.is_file() {
            if !is_usm_file(path)? {
                bail!("{} is not a USM file.", path.display());
            }

            files.push(path.to_owned());
            continue;
        }

        let pattern = if path.is_dir() {
            path.join("*.usm").to_string_lossy().into_owned()
        } else {
            input.to_owned()
        };

        for entry in glob::glob(&pattern)? {
            let entry = entry?;

            if !entry.is_file() {
                continue;
            }

            if is_usm_file(&entry)? {
                files.push(entry);
            } else {
                warn!("skipping {} (not a USM file)", entry.display());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Where the output for `input` is written.
///
/// Inside `directory` the input file name is kept, otherwise the output lands
/// next to the input with a suffix naming the operation.
pub fn output_path(input: &Path, directory: Option<&Path>, mode: OpMode) -> PathBuf {
    let name = input.file_name().map(PathBuf::from).unwrap_or_default();

    if let Some(directory) = directory {
        return directory.join(name);
    }

    let suffix = match mode {
        OpMode::Decrypt => "decrypted",
        OpMode::Encrypt => "encrypted",
        OpMode::None => "copy",
    };

    let stem = input
        .file_stem()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default();

    input.with_file_name(format!("{}.{}.usm", stem, suffix))
}

/// Fails when two inputs would be written to the same output.
pub fn ensure_distinct_outputs(inputs: &[PathBuf], outputs: &[PathBuf]) -> Result<()> {
    let mut seen = HashMap::new();

    for (input, output) in inputs.iter().zip(outputs) {
        if let Some(other) = seen.insert(output, input) {
            bail!(
                "{} and {} would both be written to {}.",
                other.display(),
                input.display(),
                output.display()
            );
        }
    }

    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_owned();
    name.push(".part");
    path.with_file_name(name)
}

/// Create `path` through a sibling `.part` file.
///
/// The partial file is renamed to `path` once `write` succeeds and removed when
/// it fails, so a failed run never leaves a truncated output behind.
pub fn write_atomic<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    let partial = partial_path(path);
    let result = File::create(&partial)
        .map_err(anyhow::Error::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            let value = write(&mut writer)?;
            writer.flush()?;
            Ok(value)
        });

    match result {
        Ok(value) => {
            fs::rename(&partial, path)?;
            Ok(value)
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

/// Run `process` over `files` on a pool of `workers` threads.
///
/// Failures are logged per file and reported together once every file is done.
pub fn process_parallel<F>(files: &[PathBuf], workers: usize, process: F) -> Result<()>
where
    F: Fn(usize, &Path) -> Result<()> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let failures = pool.install(|| {
        files
            .par_iter()
            .enumerate()
            .filter(|(i, file)| match process(*i, file) {
                Ok(()) => false,
                Err(e) => {
                    error!("{}: {:#}", file.display(), e);
                    true
                }
            })
            .count()
    });

    if failures > 0 {
        bail!("{} of {} files could not be processed.", failures, files.len());
    }

    Ok(())
}
