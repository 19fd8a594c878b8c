use std::{fmt, io};

use anyhow::Error;

use coalsfs_core::{binning::Bin, BinnedSpectrum};

const HEADER: [&str; 3] = ["center", "width", "density"];

#[derive(Debug)]
pub struct Runner<W> {
    writer: W,
    binned: BinnedSpectrum,
    header: bool,
    delimiter: char,
    precision: usize,
}

impl<W> Runner<W>
where
    W: io::Write,
{
    pub fn new(
        writer: W,
        binned: BinnedSpectrum,
        header: bool,
        delimiter: char,
        precision: usize,
    ) -> Self {
        Self {
            writer,
            binned,
            header,
            delimiter,
            precision,
        }
    }

    pub fn run(&mut self) -> Result<(), Error> {
        if self.header {
            self.write_with_delimiter(HEADER)?;
        }

        self.write_bins()
    }

    fn write_bins(&mut self) -> Result<(), Error> {
        let precision = self.precision;
        let rows = self
            .binned
            .iter()
            .map(|bin| format_bin(bin, precision))
            .collect::<Vec<_>>();

        rows.into_iter()
            .try_for_each(|row| self.write_with_delimiter(row))
    }

    fn write_with_delimiter<I>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        for (i, x) in items.into_iter().enumerate() {
            if i > 0 {
                write!(self.writer, "{}", self.delimiter)?;
            }
            write!(self.writer, "{x}")?;
        }
        writeln!(self.writer)?;

        Ok(())
    }
}

fn format_bin(bin: Bin, precision: usize) -> [String; 3] {
    [bin.center, bin.width, bin.density].map(|x| format!("{x:.precision$}"))
}
