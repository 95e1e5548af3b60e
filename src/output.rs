use std::{
    io::{self, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use fs_err::{File, OpenOptions};
use log::{debug, info};
use protondb_scraping_utils::fs_json_util::{read_json, to_writer_pretty};
use thiserror::Error;

use crate::{
    config::{Settings, Sort},
    schema::OutputDocument,
};

pub const CREATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

const MAX_SUFFIX: u32 = 999;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OutputTarget {
    /// Given by the user; overwritten if it exists.
    Explicit(PathBuf),
    /// Derived from the run; never overwrites an existing file.
    Generated(PathBuf),
}
impl OutputTarget {
    pub fn new(settings: &Settings, timestamp: DateTime<Utc>) -> Self {
        match &settings.output {
            Some(path) => Self::Explicit(path.clone()),
            None => Self::Generated(default_file_name(settings.sort, timestamp).into()),
        }
    }
}

pub fn default_file_name(sort: Sort, timestamp: DateTime<Utc>) -> String {
    format!("protondb-{sort}-{}.json", timestamp.format("%Y-%m-%d_%H-%M-%S"))
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize the games: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Every name derived from {0:?} is already taken")]
    NoFreeName(PathBuf),
}

/// Writes `document` and returns where it ended up.
pub fn write(document: &OutputDocument, target: &OutputTarget) -> Result<PathBuf, WriteError> {
    let (path, file) = match target {
        OutputTarget::Explicit(path) => {
            let file = File::create(path).map_err(|source| WriteError::Io {
                path: path.clone(),
                source,
            })?;
            (path.clone(), file)
        }
        OutputTarget::Generated(path) => create_new_file(path)?,
    };
    let mut writer = BufWriter::new(file);
    to_writer_pretty(&mut writer, document)?;
    (|| {
        writer.write_all(b"\n")?;
        writer.flush()
    })()
    .map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;
    info!("Wrote {} games to {path:?}", document.games.len());
    Ok(fs_err::canonicalize(&path).unwrap_or(path))
}

/// Opens `path`, or `path` with `-1`, `-2`, ... inserted before the extension,
/// whichever does not exist yet.
fn create_new_file(path: &Path) -> Result<(PathBuf, File), WriteError> {
    for suffix in 0..=MAX_SUFFIX {
        let candidate = with_suffix(path, suffix);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("{candidate:?} already exists");
            }
            Err(source) => {
                return Err(WriteError::Io {
                    path: candidate,
                    source,
                })
            }
        }
    }
    Err(WriteError::NoFreeName(path.to_owned()))
}

fn with_suffix(path: &Path, suffix: u32) -> PathBuf {
    if suffix == 0 {
        return path.to_owned();
    }
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(extension) => format!("{stem}-{suffix}.{}", extension.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    path.with_file_name(name)
}

pub fn read_document(path: impl AsRef<Path>) -> anyhow::Result<OutputDocument> {
    read_json(path.as_ref())
}
