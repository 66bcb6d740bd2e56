use super::types::{FileType, ReadError};
use std::path::Path;

pub fn reader_from_filetype(path: &Path) -> Result<FileType, ReadError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => Ok(FileType::Csv),
        Some("tsv") | Some("tab") => Ok(FileType::Tsv),
        _ => Err(ReadError::UnknownFileType(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_extension() {
        assert_eq!(
            reader_from_filetype(Path::new("casts/BB3.csv")).unwrap(),
            FileType::Csv
        );
        assert_eq!(
            reader_from_filetype(Path::new("surface.TSV")).unwrap(),
            FileType::Tsv
        );
        assert!(reader_from_filetype(Path::new("surface.nc")).is_err());
        assert!(reader_from_filetype(Path::new("surface")).is_err());
    }
}
