//! Utilities for reading and writing raw spectra.

pub mod read;
pub mod text;
pub mod write;

use std::path::Path;

/// Supported compression methods.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compression {
    /// Uncompressed.
    None,
    /// Gzip compression.
    Gzip,
}

impl Compression {
    const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

    fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&Self::GZIP_MAGIC_NUMBER) {
            Self::Gzip
        } else {
            Self::None
        }
    }

    /// Returns the compression method implied by the extension of a path.
    ///
    /// Paths ending in `.gz` imply gzip compression, anything else is uncompressed.
    pub fn from_path<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        match path.as_ref().extension() {
            Some(ext) if ext == "gz" => Self::Gzip,
            _ => Self::None,
        }
    }
}
