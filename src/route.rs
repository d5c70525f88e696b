//! Route marker: which list popup is open, mirrored to disk.
//!
//! The marker plays the role of an address-bar query parameter. While a
//! list popup is open the data directory holds a `route` file containing
//! `modal=A` (all contacts) or `modal=B` (country contacts); closing the
//! popup removes the file. Scripts and status bars can watch it, and the
//! `--modal` flag is the matching deep link in the other direction.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::session::ListKind;

const ROUTE_FILE_NAME: &str = "route";

pub struct RouteMarker {
    path: PathBuf,
}

impl RouteMarker {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(ROUTE_FILE_NAME) }
    }

    /// Record that a list popup is open.
    pub fn set(&self, kind: ListKind) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, format!("modal={}\n", kind.marker_letter()))
            .with_context(|| format!("failed to write route marker {}", self.path.display()))
    }

    /// Record that no popup is open. Missing marker is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove route marker {}", self.path.display())),
        }
    }

    /// Read the currently recorded popup, if any. Unrecognized content
    /// reads as `None`.
    pub fn read(&self) -> Result<Option<ListKind>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read route marker {}", self.path.display())
                })
            }
        };
        Ok(parse_marker(&content))
    }
}

fn parse_marker(content: &str) -> Option<ListKind> {
    let rest = content.trim().strip_prefix("modal=")?;
    let mut letters = rest.chars();
    let letter = letters.next()?;
    if letters.next().is_some() {
        return None;
    }
    ListKind::from_marker_letter(letter)
}
