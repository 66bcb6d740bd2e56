//! Tabular input adapters used by the binary
//!
//! The reconstruction itself works on in-memory records; these readers only
//! load the already unpacked profiler and surface tables from disk.

pub mod table;
pub mod types;
pub mod utils;

use std::path::Path;
use tracing::info;

use crate::field::{ProfileRecord, SurfaceRecord};

pub use table::TableReader;
pub use types::{DataReader, FileType, ReadError};
pub use utils::reader_from_filetype;

pub fn create_reader(file_name: &Path) -> Result<TableReader, ReadError> {
    let file_type = reader_from_filetype(file_name)?;
    Ok(TableReader {
        file_name: file_name.to_path_buf(),
        file_type,
    })
}

/// Reads every profile table matching `pattern`, in lexical path order.
pub fn read_profiles(pattern: &str) -> Result<Vec<ProfileRecord>, ReadError> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    if paths.is_empty() {
        return Err(ReadError::NoMatch(pattern.to_string()));
    }
    paths.sort();

    let mut records = Vec::new();
    for path in &paths {
        let mut file_records: Vec<ProfileRecord> = create_reader(path)?.read_data()?;
        info!("Read {} profile records from {}", file_records.len(), path.display());
        records.append(&mut file_records);
    }

    Ok(records)
}

pub fn read_surface(path: &Path) -> Result<Vec<SurfaceRecord>, ReadError> {
    let records: Vec<SurfaceRecord> = create_reader(path)?.read_data()?;
    info!("Read {} surface records from {}", records.len(), path.display());
    Ok(records)
}
