pub mod cli;
mod error;
pub mod exitlist;
pub mod render;

pub use error::Error;
pub use exitlist::ObservationTable;

use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The image was written with this many columns and rows.
    Written { width: u32, height: u32 },
    /// None of the files had an `ExitAddress` line, nothing was written.
    NoAddresses,
}

/// Ingests `files` in order, then renders the table to `out`. Stops at the
/// first failing file without touching `out`.
pub fn run(out: &Path, files: &[PathBuf]) -> Result<Outcome, Error> {
    let mut table = ObservationTable::new();
    for (i, name) in files.iter().enumerate() {
        table.ingest(i, name)?;
    }

    if table.is_empty() {
        return Ok(Outcome::NoAddresses);
    }
    tracing::debug!("observation table:\n{}", table);

    let img = render::render(&table)?;
    render::write_png(&img, out)?;
    let (width, height) = img.dimensions();
    tracing::info!(width, height, out = %out.display(), "wrote exit address map");
    Ok(Outcome::Written { width, height })
}
