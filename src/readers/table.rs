use serde::de::DeserializeOwned;
use std::path::PathBuf;

use super::types::{DataReader, FileType, ReadError};

/// Delimited text table with a header row, one record per line
pub struct TableReader {
    pub file_name: PathBuf,
    pub file_type: FileType,
}

impl<T: DeserializeOwned> DataReader<T> for TableReader {
    fn read_data(&self) -> Result<Vec<T>, ReadError> {
        let to_read_error = |source: csv::Error| ReadError::Csv {
            path: self.file_name.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.file_type.delimiter())
            .trim(csv::Trim::All)
            .from_path(&self.file_name)
            .map_err(to_read_error)?;

        reader
            .deserialize()
            .collect::<Result<Vec<T>, csv::Error>>()
            .map_err(to_read_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ProfileRecord, SurfaceRecord};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_profile_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cast.csv");
        fs::write(
            &path,
            "cast_id,station,timestamp,wavelength,depth,value\n\
             c1,BB3,2023-07-14T12:00:00,490,1.5,120.4\n\
             c1,BB3,2023-07-14T12:00:02, 490 ,2.0,110.0\n",
        )
        .unwrap();

        let reader = TableReader {
            file_name: path,
            file_type: FileType::Csv,
        };
        let records: Vec<ProfileRecord> = reader.read_data().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].station, "BB3");
        assert_eq!(records[1].wavelength, 490);
        assert_eq!(records[1].depth, 2.0);
    }

    #[test]
    fn test_read_tab_separated_surface_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("surface.tsv");
        fs::write(
            &path,
            "timestamp\twavelength\tvalue\n2023-07-14T12:00:00\t555\t80.1\n",
        )
        .unwrap();

        let reader = TableReader {
            file_name: path,
            file_type: FileType::Tsv,
        };
        let records: Vec<SurfaceRecord> = reader.read_data().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 80.1);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("surface.csv");
        fs::write(&path, "timestamp,wavelength,value\nnot-a-date,555,1.0\n").unwrap();

        let reader = TableReader {
            file_name: path,
            file_type: FileType::Csv,
        };
        let result: Result<Vec<SurfaceRecord>, ReadError> = reader.read_data();

        assert!(matches!(result, Err(ReadError::Csv { .. })));
    }
}
