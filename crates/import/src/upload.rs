use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const RETRY_DELAY: Duration = Duration::from_millis(100);

/// An uploaded statement spooled to a temporary file.
///
/// The file is removed when the handle drops, whether or not parsing
/// succeeded. A failed removal is retried once after a short pause and then
/// only logged.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
}

impl UploadedFile {
    /// Spools `data` into `dir` with the given extension.
    pub fn create_in(dir: &Path, data: &[u8], extension: &str) -> io::Result<Self> {
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut file = tempfile::Builder::new()
            .prefix("saldo-upload-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;

        // Take over deletion so it can be retried and logged.
        let (_handle, path) = file.keep().map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "spooled upload");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        remove_with_retry(&self.path, RETRY_DELAY);
    }
}

/// Deletes `path`, retrying once after `delay`. Returns whether the file is gone.
pub(crate) fn remove_with_retry(path: &Path, delay: Duration) -> bool {
    match fs::remove_file(path) {
        Ok(()) => return true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return true,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "temporary upload removal failed, retrying");
        }
    }

    thread::sleep(delay);
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not delete temporary upload");
            false
        }
    }
}
