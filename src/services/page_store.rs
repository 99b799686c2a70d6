use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::errors::WikiError;
use crate::types::{Page, Title};

/// Flat-file page storage: one `<title>.txt` per page.
///
/// There is no locking. Concurrent saves to one title race (last writer
/// wins) and a load running alongside a save may see a partial file.
#[derive(Clone, Debug)]
pub struct PageStore {
    base_dir: PathBuf,
}

impl PageStore {
    /// Create a new page store rooted at `base_dir`
    pub fn new(base_dir: PathBuf) -> Self {
        debug!("Creating PageStore with base directory: {:?}", base_dir);
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File backing the given title
    pub fn path_for(&self, title: &Title) -> PathBuf {
        self.base_dir.join(title.file_name())
    }

    /// Write the page body verbatim, creating or truncating its file
    pub fn save(&self, page: &Page) -> Result<(), WikiError> {
        let full_path = self.path_for(&page.title);
        debug!("Saving page '{}' to {:?}", page.title, full_path);

        write_owner_only(&full_path, &page.body).map_err(|e| {
            error!("Failed to write page file {:?}: {}", full_path, e);
            WikiError::Persistence { title: page.title.to_string(), source: e }
        })?;

        info!("Saved page '{}', {} bytes", page.title, page.body.len());
        Ok(())
    }

    /// Read a page back from disk
    pub fn load(&self, title: &Title) -> Result<Page, WikiError> {
        let full_path = self.path_for(title);
        debug!("Loading page '{}' from {:?}", title, full_path);

        let body = fs::read(&full_path).map_err(|e| {
            warn!("Failed to read page file {:?}: {}", full_path, e);
            WikiError::PageNotFound { title: title.to_string(), source: e }
        })?;

        info!("Loaded page '{}', {} bytes", title, body.len());
        Ok(Page::new(title.clone(), body))
    }
}

// Permissions only apply when the file is created; an existing file keeps its mode.
fn write_owner_only(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)
}
