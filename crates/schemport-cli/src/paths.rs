use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use schemport_convert::ConversionJob;
use schemport_core::constants::OUTPUT_EXTENSION;

/// Input/output path problems detected before any conversion starts.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("File '{}' not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Folder '{}' not found.", .0.display())]
    FolderNotFound(PathBuf),

    #[error("could not create output folder {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not list folder {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the job list for the given input, output and mode.
pub fn resolve_jobs(
    input: &Path,
    output: Option<&Path>,
    folder: bool,
) -> Result<Vec<ConversionJob>, PathError> {
    if folder {
        folder_jobs(input, output)
    } else {
        single_file_job(input, output).map(|job| vec![job])
    }
}

/// One job for a single file. The output defaults to the input with its
/// extension replaced by `.nbt`.
pub fn single_file_job(input: &Path, output: Option<&Path>) -> Result<ConversionJob, PathError> {
    if !input.is_file() {
        return Err(PathError::FileNotFound(input.to_path_buf()));
    }
    let dest = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(OUTPUT_EXTENSION),
    };
    Ok(ConversionJob::new(input, dest))
}

/// One job per regular file directly inside `input` (not recursive),
/// sorted by name. The output folder defaults to `input` and is created if
/// missing; each `name.ext` becomes `<output>/name.nbt`.
///
/// Inputs that share a stem (`house.schem`, `house.schematic`) would collide
/// on one output. The first in sorted order keeps `name.nbt`; later ones use
/// their full file name, `name.ext.nbt`, which no earlier input can claim.
pub fn folder_jobs(input: &Path, output: Option<&Path>) -> Result<Vec<ConversionJob>, PathError> {
    if !input.is_dir() {
        return Err(PathError::FolderNotFound(input.to_path_buf()));
    }
    let out_dir = output.unwrap_or(input);
    std::fs::create_dir_all(out_dir).map_err(|source| PathError::CreateOutput {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let read_dir_err = |source: std::io::Error| PathError::ReadDir {
        path: input.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut taken = HashSet::new();
    let mut jobs = Vec::with_capacity(files.len());
    for source in files {
        let (Some(stem), Some(file_name)) = (source.file_stem(), source.file_name()) else {
            continue;
        };
        let preferred = out_dir.join(output_name(stem));
        let dest = if taken.insert(preferred.clone()) {
            preferred
        } else {
            let fallback = out_dir.join(output_name(file_name));
            taken.insert(fallback.clone());
            log::warn!(
                "{} would overwrite {}, writing {} instead",
                source.display(),
                preferred.display(),
                fallback.display()
            );
            fallback
        };
        jobs.push(ConversionJob::new(source, dest));
    }
    Ok(jobs)
}

fn output_name(base: &OsStr) -> OsString {
    let mut name = base.to_owned();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    name
}
