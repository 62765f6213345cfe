//! JSON export of extracted listings
//!
//! Each record is written as a flat object: the fixed fields plus one key per
//! key detail.

use crate::config::OutputConfig;
use crate::listing::ListingRecord;
use crate::CrawlerError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serializes the records as a JSON array into `writer`
pub fn write_records<W: Write>(
    records: &[ListingRecord],
    mut writer: W,
    pretty: bool,
) -> Result<(), CrawlerError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, records)?;
    } else {
        serde_json::to_writer(&mut writer, records)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes the records where the output config says: a file, or stdout
///
/// # Returns
///
/// * `Ok(())` - Records written
/// * `Err(CrawlerError)` - The file could not be created or written
pub fn export_records(records: &[ListingRecord], config: &OutputConfig) -> Result<(), CrawlerError> {
    match &config.path {
        Some(path) => {
            let file = File::create(Path::new(path))?;
            write_records(records, BufWriter::new(file), config.pretty)?;
            tracing::info!("Wrote {} listings to {}", records.len(), path);
        }
        None => {
            let stdout = io::stdout();
            write_records(records, stdout.lock(), config.pretty)?;
        }
    }
    Ok(())
}
