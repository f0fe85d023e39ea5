use std::{fs::File, io::Write, path::Path};

use anyhow::Context;

use crate::domain::{JobListing, HEADER};

/// Receives the whole result set once, at the end of a run.
pub trait ResultSink {
    /// Returns the number of data rows written.
    fn write(&mut self, listings: &[JobListing]) -> anyhow::Result<usize>;
}

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(CsvSink::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        CsvSink { writer }
    }

    pub fn into_inner(self) -> anyhow::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush csv writer: {}", e.error()))
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn write(&mut self, listings: &[JobListing]) -> anyhow::Result<usize> {
        // Header goes out even when nothing was harvested.
        self.writer.write_record(HEADER)?;
        for listing in listings {
            self.writer.write_record(listing.as_row())?;
        }
        self.writer.flush()?;
        Ok(listings.len())
    }
}
