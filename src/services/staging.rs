//! Local staging of files moving between disk and the object store.
//!
//! A [`StagedFile`] is removed when it is closed or dropped, whichever comes
//! first, so every exit path of the owning operation cleans up after itself.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const STAGED_PREFIX: &str = "temp_";
const FALLBACK_BASENAME: &str = "object";
// Keeps temp_<random>_<basename> under the usual 255-byte NAME_MAX.
const MAX_STAGED_BASENAME: usize = 200;
const MAX_KEPT_EXTENSION: usize = 16;

#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reserves an empty file for a download to overwrite.
    pub fn stage_for_read(&self, identifier: &str) -> io::Result<StagedFile> {
        let file = self.create(identifier)?;
        Ok(StagedFile {
            path: file.into_temp_path(),
        })
    }

    /// Creates a file holding `contents`, flushed and closed for reading by path.
    pub fn stage_for_write(&self, identifier: &str, contents: &[u8]) -> io::Result<StagedFile> {
        let mut file = self.create(identifier)?;
        file.write_all(contents)?;
        file.flush()?;
        Ok(StagedFile {
            path: file.into_temp_path(),
        })
    }

    fn create(&self, identifier: &str) -> io::Result<tempfile::NamedTempFile> {
        // temp_<random>_<basename>
        let suffix = format!("_{}", staged_base_name(identifier));
        let file = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(&suffix)
            .rand_bytes(8)
            .tempfile_in(&self.dir)?;
        tracing::debug!("Staged {}", file.path().display());
        Ok(file)
    }
}

/// Last `/`-separated segment of an object key.
fn base_name(identifier: &str) -> &str {
    identifier
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_BASENAME)
}

/// [`base_name`] shortened to fit a staged file name. The extension survives
/// truncation so the staged file keeps its type.
fn staged_base_name(identifier: &str) -> Cow<'_, str> {
    let name = base_name(identifier);
    if name.len() <= MAX_STAGED_BASENAME {
        return Cow::Borrowed(name);
    }

    let extension = name
        .rfind('.')
        .map(|dot| &name[dot..])
        .filter(|ext| ext.len() <= MAX_KEPT_EXTENSION)
        .unwrap_or("");
    let mut stem_len = MAX_STAGED_BASENAME - extension.len();
    while !name.is_char_boundary(stem_len) {
        stem_len -= 1;
    }
    Cow::Owned(format!("{}{}", &name[..stem_len], extension))
}

#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file now, reporting failure. A file already gone counts as removed.
    pub fn close(self) -> io::Result<()> {
        match self.path.close() {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
