// Save Persistence Engine
//
// Battery-backed cartridge RAM is kept as one compressed file per cartridge,
// named after the cartridge title. Unreadable files are discarded and the RAM
// starts from the erased state (all 0xFF); failures are reported through a
// single "last status" value and never stop the game.

pub mod codec;
pub mod store;

pub use codec::{Codec, CodecError, Lz4Codec};
pub use store::{DirStore, FileStore, MemoryStore, StoreError};

use crate::core::TITLE_LEN;

/// Suffix appended to every save file name
pub const SAVE_SUFFIX: &str = ".gbs";

/// Byte value of erased flash
pub const ERASED: u8 = 0xFF;

/// Derive the save file name from the cartridge title field
///
/// The title is cut at its first NUL byte (or used whole if there is none)
/// and `.gbs` is appended.
pub fn save_file_name(title: &[u8; TITLE_LEN]) -> String {
    let end = title.iter().position(|&b| b == 0).unwrap_or(TITLE_LEN);
    let mut name = String::from_utf8_lossy(&title[..end]).into_owned();
    name.push_str(SAVE_SUFFIX);
    name
}

/// Last persistence outcome, shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    ReadOk,
    WriteOk,
    ReadError,
    WriteError,
    CompressionError,
    /// Nothing to show
    #[default]
    NoDisplay,
}

impl SaveStatus {
    /// On-screen label, `None` when nothing should be shown
    pub fn label(self) -> Option<&'static str> {
        match self {
            SaveStatus::ReadOk => Some("LOADED"),
            SaveStatus::WriteOk => Some("SAVED"),
            SaveStatus::ReadError => Some("READ ERROR"),
            SaveStatus::WriteError => Some("WRITE ERROR"),
            SaveStatus::CompressionError => Some("NO SPACE"),
            SaveStatus::NoDisplay => None,
        }
    }
}

/// Persistence errors
#[derive(Debug)]
pub enum SaveError {
    /// Stored data could not be decompressed
    Read(CodecError),
    /// Stored data decompressed to the wrong size
    SizeMismatch { expected: usize, found: usize },
    /// The store could not read the file
    StoreRead(StoreError),
    /// The store could not write the file
    Write(StoreError),
    /// Compressed data does not fit in the store
    Compression(CodecError),
}

impl SaveError {
    /// Status value recorded for this error
    pub fn status(&self) -> SaveStatus {
        match self {
            SaveError::Read(_) | SaveError::SizeMismatch { .. } | SaveError::StoreRead(_) => {
                SaveStatus::ReadError
            }
            SaveError::Write(_) => SaveStatus::WriteError,
            SaveError::Compression(_) => SaveStatus::CompressionError,
        }
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Read(e) => write!(f, "Save file is corrupted: {}", e),
            SaveError::SizeMismatch { expected, found } => write!(
                f,
                "Save file size mismatch: expected {} bytes, found {}",
                expected, found
            ),
            SaveError::StoreRead(e) => write!(f, "Failed to read save file: {}", e),
            SaveError::Write(e) => write!(f, "Failed to write save file: {}", e),
            SaveError::Compression(e) => write!(f, "Failed to compress save: {}", e),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Read(e) | SaveError::Compression(e) => Some(e),
            SaveError::StoreRead(e) | SaveError::Write(e) => Some(e),
            SaveError::SizeMismatch { .. } => None,
        }
    }
}

/// Where the contents of a loaded buffer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decompressed from the save file
    Restored,
    /// No save file; buffer is in the erased state
    Fresh,
}

/// Buffer returned by [`SaveManager::load`]
#[derive(Debug)]
pub struct LoadedSave {
    pub data: Vec<u8>,
    pub outcome: Result<LoadSource, SaveError>,
}

/// Save Persistence Engine bound to one cartridge
pub struct SaveManager<S: FileStore, C: Codec = Lz4Codec> {
    store: S,
    codec: C,
    file_name: String,
    status: SaveStatus,
}

impl<S: FileStore> SaveManager<S, Lz4Codec> {
    /// Create a manager for the cartridge with the given title field
    pub fn new(store: S, title: &[u8; TITLE_LEN]) -> Self {
        Self::with_codec(store, Lz4Codec, title)
    }
}

impl<S: FileStore, C: Codec> SaveManager<S, C> {
    pub fn with_codec(store: S, codec: C, title: &[u8; TITLE_LEN]) -> Self {
        SaveManager {
            store,
            codec,
            file_name: save_file_name(title),
            status: SaveStatus::NoDisplay,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Last recorded status
    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Reset the status once it has been shown
    pub fn clear_status(&mut self) {
        self.status = SaveStatus::NoDisplay;
    }

    pub fn file_store(&self) -> &S {
        &self.store
    }

    pub fn file_store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Allocate a buffer of `size` bytes and fill it from the save file
    pub fn load(&mut self, size: usize) -> LoadedSave {
        let mut data = vec![ERASED; size];
        let outcome = self.load_into(&mut data);
        LoadedSave { data, outcome }
    }

    /// Fill `buf` from the save file
    ///
    /// With no save file, `buf` is erased and the status is left unchanged.
    /// A file that cannot be decompressed into exactly `buf.len()` bytes is
    /// deleted and `buf` is erased.
    pub fn load_into(&mut self, buf: &mut [u8]) -> Result<LoadSource, SaveError> {
        if !self.store.exists(&self.file_name) {
            buf.fill(ERASED);
            log::info!("No save file {}, starting fresh", self.file_name);
            return Ok(LoadSource::Fresh);
        }

        let stored = match self.store.read(&self.file_name) {
            Ok(stored) => stored,
            Err(e) => {
                buf.fill(ERASED);
                self.status = SaveStatus::ReadError;
                log::error!("Failed to read {}: {}", self.file_name, e);
                return Err(SaveError::StoreRead(e));
            }
        };

        let result = match self.codec.decompress(&stored, buf) {
            Ok(len) if len == buf.len() => Ok(LoadSource::Restored),
            Ok(len) => Err(SaveError::SizeMismatch {
                expected: buf.len(),
                found: len,
            }),
            Err(e) => Err(SaveError::Read(e)),
        };

        match result {
            Ok(source) => {
                self.status = SaveStatus::ReadOk;
                log::info!(
                    "Loaded {} ({} bytes from {} compressed)",
                    self.file_name,
                    buf.len(),
                    stored.len()
                );
                Ok(source)
            }
            Err(e) => {
                buf.fill(ERASED);
                self.store.erase(&self.file_name);
                self.status = SaveStatus::ReadError;
                log::warn!("Discarded {}: {}", self.file_name, e);
                Err(e)
            }
        }
    }

    /// Compress `data` and replace the save file with it
    ///
    /// A compression failure leaves the existing file untouched. Otherwise the
    /// old file is erased before the new one is written, so a failed write
    /// leaves no save file.
    ///
    /// # Returns
    ///
    /// Number of bytes written to the store
    pub fn store(&mut self, data: &[u8]) -> Result<usize, SaveError> {
        let compressed = match self.codec.compress(data, self.store.max_size()) {
            Ok(compressed) => compressed,
            Err(e) => {
                self.status = SaveStatus::CompressionError;
                log::error!("Failed to compress {}: {}", self.file_name, e);
                return Err(SaveError::Compression(e));
            }
        };

        self.store.erase(&self.file_name);
        match self.store.write(&self.file_name, &compressed) {
            Ok(()) => {
                self.status = SaveStatus::WriteOk;
                log::info!(
                    "Saved {} ({} bytes compressed to {})",
                    self.file_name,
                    data.len(),
                    compressed.len()
                );
                Ok(compressed.len())
            }
            Err(e) => {
                self.status = SaveStatus::WriteError;
                log::error!("Failed to write {}: {}", self.file_name, e);
                Err(SaveError::Write(e))
            }
        }
    }
}
