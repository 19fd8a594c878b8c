//! Utilities for reading raw spectra.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use flate2::bufread::MultiGzDecoder;

use crate::RawSpectrum;

use super::{text, Compression};

/// A builder to read a raw spectrum.
#[derive(Debug, Default)]
pub struct Builder {
    compression: Option<Compression>,
}

impl Builder {
    /// Read raw spectrum from reader.
    pub fn read<R>(self, reader: &mut R) -> io::Result<RawSpectrum>
    where
        R: io::Read,
    {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        let compression = self
            .compression
            .unwrap_or_else(|| Compression::detect(&raw));

        match compression {
            Compression::None => text::read_spectrum(&mut &raw[..]),
            Compression::Gzip => {
                let mut decompressed = Vec::new();
                MultiGzDecoder::new(&raw[..]).read_to_end(&mut decompressed)?;
                text::read_spectrum(&mut &decompressed[..])
            }
        }
    }

    /// Read raw spectrum from path.
    ///
    /// Errors include the path in their message.
    pub fn read_from_path<P>(self, path: P) -> io::Result<RawSpectrum>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        fs::File::open(path)
            .and_then(|mut file| self.read(&mut file))
            .map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("failed to read spectrum from '{}': {e}", path.display()),
                )
            })
    }

    /// Read raw spectrum from path or stdin.
    ///
    /// If the provided path is `None`, read from stdin.
    pub fn read_from_path_or_stdin<P>(self, path: Option<P>) -> io::Result<RawSpectrum>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) => self.read_from_path(path),
            None => self.read_from_stdin(),
        }
    }

    /// Read raw spectrum from stdin.
    pub fn read_from_stdin(self) -> io::Result<RawSpectrum> {
        self.read(&mut io::stdin().lock())
    }

    /// Set compression method.
    ///
    /// If unset, gzip compression will automatically be detected when reading.
    pub fn set_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use flate2::write::GzEncoder;

    fn gzip(src: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(src).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_read_plain() -> io::Result<()> {
        let spectrum = Builder::default().read(&mut &b"0.0\n2.0\n1.0\n"[..])?;

        assert_eq!(spectrum, RawSpectrum::new([0., 2., 1.]).unwrap());

        Ok(())
    }

    #[test]
    fn test_read_detects_gzip() -> io::Result<()> {
        let compressed = gzip(b"0.0\n2.0\n1.0\n");
        let spectrum = Builder::default().read(&mut &compressed[..])?;

        assert_eq!(spectrum, RawSpectrum::new([0., 2., 1.]).unwrap());

        Ok(())
    }

    #[test]
    fn test_read_forced_compression() {
        let result = Builder::default()
            .set_compression(Compression::Gzip)
            .read(&mut &b"0.0\n2.0\n1.0\n"[..]);

        assert!(result.is_err());
    }

    #[test]
    fn test_read_path_with_invalid_values() -> io::Result<()> {
        let path = std::env::temp_dir().join(format!(
            "coalsfs-test-{}-invalid-values.dat",
            std::process::id()
        ));
        std::fs::write(&path, "0.0\nNaN\n-4.0\ninf\n0.0\n")?;

        let result = Builder::default().read_from_path(&path);
        std::fs::remove_file(&path)?;

        let error = result.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        let message = error.to_string();
        assert!(message.contains("'NaN' on line 2"));

        Ok(())
    }

    #[test]
    fn test_read_missing_path() {
        let path = std::env::temp_dir().join("coalsfs-test-does-not-exist.dat");
        let error = Builder::default().read_from_path(&path).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        let message = error.to_string();
        assert!(message.contains("coalsfs-test-does-not-exist.dat"));
    }
}
