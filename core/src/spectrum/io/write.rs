//! Utilities for writing raw spectra.

use std::{fs, io, path::Path};

use flate2::write::GzEncoder;

use crate::RawSpectrum;

use super::{text, Compression};

/// A builder to write a raw spectrum.
#[derive(Debug)]
pub struct Builder {
    compression: Option<Compression>,
    precision: usize,
}

impl Builder {
    /// Set compression method.
    ///
    /// If unset, writing to a path will use gzip compression if the path ends in `.gz`, and
    /// writing elsewhere will be uncompressed.
    pub fn set_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Set precision.
    ///
    /// This is the number of digits after the decimal point in scientific notation.
    /// If unset, a precision of 18 digits will be used, which is enough to recover the
    /// written values exactly.
    pub fn set_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Write raw spectrum to writer.
    pub fn write<W>(self, writer: &mut W, spectrum: &RawSpectrum) -> io::Result<()>
    where
        W: io::Write,
    {
        match self.compression.unwrap_or(Compression::None) {
            Compression::None => {
                text::write_spectrum(writer, spectrum, self.precision)?;
                writer.flush()
            }
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
                text::write_spectrum(&mut encoder, spectrum, self.precision)?;
                encoder.finish()?.flush()
            }
        }
    }

    /// Write raw spectrum to stdout.
    pub fn write_to_stdout(self, spectrum: &RawSpectrum) -> io::Result<()> {
        self.write(&mut io::stdout().lock(), spectrum)
    }

    /// Write raw spectrum to path.
    ///
    /// If path already exists, it will be overwritten. Errors include the path in their message.
    pub fn write_to_path<P>(mut self, path: P, spectrum: &RawSpectrum) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        self.compression = self.compression.or(Some(Compression::from_path(path)));

        fs::File::create(path)
            .map(io::BufWriter::new)
            .and_then(|mut writer| self.write(&mut writer, spectrum))
            .map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("failed to write spectrum to '{}': {e}", path.display()),
                )
            })
    }

    /// Write raw spectrum to path or stdout.
    ///
    /// If the provided path is `None`, write to stdout.
    /// If path already exists, it will be overwritten.
    pub fn write_to_path_or_stdout<P>(
        self,
        path: Option<P>,
        spectrum: &RawSpectrum,
    ) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) => self.write_to_path(path, spectrum),
            None => self.write_to_stdout(spectrum),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            compression: None,
            precision: 18,
        }
    }
}
