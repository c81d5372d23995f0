//! Directory-tree walkers
//!
//! Three layers, each a thin shell around the previous:
//!
//! - [`Walker`]: visit every directory under a root, depth-first with
//!   sorted entries, handing each directory's selected files to a visitor
//! - [`JsonWalker`]: a walker fixed to `.json` files that parses each one
//!   and hands the visitor parsed documents instead of paths
//! - [`PlaceWalker`]: builds a place collection per directory batch and
//!   merges the batches into one collection in traversal order
//!
//! Traversal is deterministic: entries at every level are visited in
//! lexicographic path order, parents before children. Symlinked
//! directories are never descended; symlinked files are read through.

use crate::error::{Error, Result};
use gazetteer_index::{IndexPolicy, PlaceCollection};
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Walker
// ============================================================================

/// Selectively visit files in a directory tree
///
/// Construction canonicalizes the root and requires it to be a directory.
/// The extension filter is case-insensitive; an empty filter selects every
/// regular file.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    extensions: Vec<String>,
}

impl Walker {
    /// Create a walker rooted at `path`, selecting files by extension
    ///
    /// Extensions carry their leading dot, as in `&[".json"]`.
    pub fn new(path: impl AsRef<Path>, extensions: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let root = path.canonicalize().map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(Error::NotADirectory { path: root });
        }
        Ok(Walker {
            root,
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        })
    }

    /// The canonicalized walk root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, handing each directory's selected files to `visit`
    ///
    /// Returns the number of files selected across the whole walk. Every
    /// directory is visited, including ones with no selected files, except
    /// directories reached only through a symlink.
    pub fn walk<F>(&self, visit: &mut F) -> Result<usize>
    where
        F: FnMut(&Path, &[PathBuf]) -> Result<()>,
    {
        let mut selected = 0;
        self.walk_dir(&self.root, visit, &mut selected)?;
        Ok(selected)
    }

    fn walk_dir<F>(&self, dir: &Path, visit: &mut F, selected: &mut usize) -> Result<()>
    where
        F: FnMut(&Path, &[PathBuf]) -> Result<()>,
    {
        let entries = fs::read_dir(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let file_type = entry.file_type().map_err(|source| Error::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_symlink() && path.is_dir() {
                // A symlinked directory would allow cycles; never descend it.
                debug!(
                    target: "gazetteer::walker",
                    path = %path.display(),
                    "Skipping symlinked directory"
                );
            } else if self.selects(&path) {
                files.push(path);
            }
        }
        files.sort();
        subdirs.sort();

        debug!(
            target: "gazetteer::walker",
            dir = %dir.display(),
            files = files.len(),
            "Visiting directory"
        );
        *selected += files.len();
        visit(dir, &files)?;

        for subdir in subdirs {
            self.walk_dir(&subdir, visit, selected)?;
        }
        Ok(())
    }

    fn selects(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .map_or(false, |ext| self.extensions.contains(&ext))
    }
}

// ============================================================================
// JsonWalker
// ============================================================================

/// A walker over `.json` files that parses each selected file
#[derive(Debug, Clone)]
pub struct JsonWalker {
    walker: Walker,
}

impl JsonWalker {
    /// Create a JSON walker rooted at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(JsonWalker {
            walker: Walker::new(path, &[".json"])?,
        })
    }

    /// The canonicalized walk root
    pub fn root(&self) -> &Path {
        self.walker.root()
    }

    /// Walk the tree, handing each directory's parsed documents to `visit`
    ///
    /// Returns the number of `.json` files parsed. A file that fails to
    /// parse aborts the walk with [`Error::Json`] naming the file.
    pub fn walk<F>(&self, visit: &mut F) -> Result<usize>
    where
        F: FnMut(&Path, Vec<Value>) -> Result<()>,
    {
        self.walker.walk(&mut |dir, files| {
            let mut documents = Vec::with_capacity(files.len());
            for path in files {
                let text = fs::read_to_string(path).map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
                let value = serde_json::from_str(&text).map_err(|source| Error::Json {
                    path: path.clone(),
                    source,
                })?;
                documents.push(value);
            }
            visit(dir, documents)
        })
    }
}

// ============================================================================
// PlaceWalker
// ============================================================================

/// A walker that ingests every place record under a directory tree
#[derive(Debug, Clone)]
pub struct PlaceWalker {
    json: JsonWalker,
}

/// What a finished walk produced
#[derive(Debug)]
pub struct WalkOutcome {
    /// Number of `.json` files the walk selected and parsed
    pub files: usize,
    /// Every place record from those files, merged in traversal order
    pub collection: PlaceCollection,
}

impl PlaceWalker {
    /// Create a place walker rooted at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(PlaceWalker {
            json: JsonWalker::new(path)?,
        })
    }

    /// The canonicalized walk root
    pub fn root(&self) -> &Path {
        self.json.root()
    }

    /// Walk the tree and collect every record into one collection
    ///
    /// Each directory's documents are added to a collection of their own,
    /// which is then merged into the running result. A document that is not
    /// a valid place record aborts the walk.
    pub fn collect(&self, policy: IndexPolicy) -> Result<WalkOutcome> {
        let mut collection = PlaceCollection::with_policy(policy);
        let files = self.json.walk(&mut |_dir, documents| {
            let mut batch = PlaceCollection::with_policy(policy);
            for document in documents {
                batch.add_json(document)?;
            }
            collection.merge(&batch)?;
            Ok(())
        })?;
        info!(
            target: "gazetteer::walker",
            files,
            records = collection.len(),
            "Walk complete"
        );
        Ok(WalkOutcome { files, collection })
    }
}

// ============================================================================
// Tests
// ============================================================================
