// Flat-file store
//
// The calculator exposes a small flat namespace of files with a fixed total
// capacity. `MemoryStore` models that directly; `DirStore` backs the same
// contract with a host directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Store errors
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    /// Writing would exceed the store capacity
    Full { needed: usize, available: usize },
    /// The name cannot be used as a flat file name
    InvalidName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Full { needed, available } => write!(
                f,
                "Store full: {} bytes needed, {} available",
                needed, available
            ),
            StoreError::InvalidName(name) => write!(f, "Invalid file name: {:?}", name),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Flat-file storage primitive
pub trait FileStore {
    fn exists(&self, name: &str) -> bool;

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace `name` with `data`
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Remove `name`; returns `false` if nothing was removed
    fn erase(&mut self, name: &str) -> bool;

    /// Total capacity of the store in bytes
    fn max_size(&self) -> usize;
}

impl<T: FileStore + ?Sized> FileStore for &mut T {
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        (**self).read(name)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).write(name, data)
    }

    fn erase(&mut self, name: &str) -> bool {
        (**self).erase(name)
    }

    fn max_size(&self) -> usize {
        (**self).max_size()
    }
}

fn check_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// In-memory store with a fixed capacity
#[derive(Debug, Clone)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        MemoryStore {
            files: HashMap::new(),
            capacity,
        }
    }

    /// Bytes currently used by all files
    pub fn used(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStore for MemoryStore {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.files.get(name).cloned().ok_or_else(|| {
            StoreError::Io(io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        })
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        check_name(name)?;
        let replaced = self.files.get(name).map_or(0, Vec::len);
        let available = self.capacity.saturating_sub(self.used() - replaced);
        if data.len() > available {
            return Err(StoreError::Full {
                needed: data.len(),
                available,
            });
        }
        self.files.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn erase(&mut self, name: &str) -> bool {
        self.files.remove(name).is_some()
    }

    fn max_size(&self) -> usize {
        self.capacity
    }
}

/// Store backed by a host directory
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    capacity: usize,
}

impl DirStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new<P: AsRef<Path>>(root: P, capacity: usize) -> Self {
        DirStore {
            root: root.as_ref().to_path_buf(),
            capacity,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn used_except(&self, name: &str) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut used = 0;
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() && entry.file_name() != name {
                used += metadata.len() as usize;
            }
        }
        Ok(used)
    }
}

impl FileStore for DirStore {
    fn exists(&self, name: &str) -> bool {
        check_name(name).is_ok() && self.path_of(name).is_file()
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        check_name(name)?;
        Ok(fs::read(self.path_of(name))?)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        check_name(name)?;
        let available = self.capacity.saturating_sub(self.used_except(name)?);
        if data.len() > available {
            return Err(StoreError::Full {
                needed: data.len(),
                available,
            });
        }
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_of(name), data)?;
        Ok(())
    }

    fn erase(&mut self, name: &str) -> bool {
        check_name(name).is_ok() && fs::remove_file(self.path_of(name)).is_ok()
    }

    fn max_size(&self) -> usize {
        self.capacity
    }
}
