//! Reading and writing for the text format.
//!
//! The plain text format is a flat sequence of numbers, one value per line, with no header.
//! When reading, blank lines and lines starting with `#` are skipped, and values may also be
//! separated by whitespace on a single line. Several lines with several values each are
//! rejected, since a raw spectrum is one-dimensional.

use std::{io, str::FromStr};

use crate::spectrum::{RawSpectrum, SpectrumError};

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

fn parse_rows(s: &str) -> io::Result<Vec<Vec<f64>>> {
    s.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| {
            line.split_ascii_whitespace()
                .map(|value| parse_value(value, line_number))
                .collect::<io::Result<Vec<_>>>()
        })
        .collect()
}

fn parse_value(s: &str, line_number: usize) -> io::Result<f64> {
    match f64::from_str(s) {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Ok(_) => Err(invalid_data(format!(
            "found '{s}' on line {line_number}, expected a finite, non-negative number"
        ))),
        Err(_) => Err(invalid_data(format!(
            "failed to parse '{s}' as number on line {line_number}"
        ))),
    }
}

fn parse_spectrum(s: &str) -> io::Result<RawSpectrum> {
    let rows = parse_rows(s)?;

    let values = match rows.as_slice() {
        [row] => row.clone(),
        rows if rows.iter().all(|row| row.len() == 1) => rows.concat(),
        rows => {
            let cols = rows[0].len();

            return if rows.iter().all(|row| row.len() == cols) {
                Err(invalid_data(SpectrumError::NotOneDimensional {
                    shape: [rows.len(), cols],
                }))
            } else {
                Err(invalid_data("inconsistent number of values per line"))
            };
        }
    };

    RawSpectrum::new(values).map_err(invalid_data)
}

/// Reads a raw spectrum in text format from a reader.
///
/// The stream is assumed to be positioned at the start.
pub fn read_spectrum<R>(reader: &mut R) -> io::Result<RawSpectrum>
where
    R: io::BufRead,
{
    let mut buf = String::new();
    let _bytes_read = reader.read_to_string(&mut buf)?;

    parse_spectrum(&buf)
}

/// Writes a raw spectrum in text format to a writer.
///
/// Values are written in scientific notation with `precision` digits after the decimal point.
pub fn write_spectrum<W>(
    writer: &mut W,
    spectrum: &RawSpectrum,
    precision: usize,
) -> io::Result<()>
where
    W: io::Write,
{
    spectrum
        .as_slice()
        .iter()
        .try_for_each(|x| writeln!(writer, "{x:.precision$e}"))
}
