use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use nix::unistd::{access, AccessFlags};
use tracing::debug;

use bp_tracker_domain::ReadingRecord;

use crate::models::reading_row::{ColumnLayout, SchemaVersion, HEADERS};
use super::errors::ReadFailure;

/// File-level operations on the reading file
pub struct CsvFile;

impl CsvFile {
    /// True when the file is missing or has no bytes at all
    pub fn is_uninitialized(path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Create parent directories and write the current header row
    pub fn write_header(path: &Path) -> io::Result<()> {
        if let Some(parent) = parent_dir(path) {
            if !parent.exists() {
                debug!("Creating data directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = row_writer(file);
        writer.write_record(HEADERS)?;
        writer.flush()?;
        Ok(())
    }

    /// Schema generation of an existing file, judged by its header row
    pub fn schema_version(path: &Path) -> io::Result<SchemaVersion> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let headers = reader.headers()?;
        Ok(SchemaVersion::detect(headers))
    }

    /// Replace the header row with the current header, leaving every data
    /// row byte-for-byte as it was
    pub fn rewrite_header(path: &Path) -> io::Result<()> {
        let contents = fs::read(path)?;
        let body = &contents[header_end(&contents)..];

        let mut migrated = Vec::with_capacity(contents.len() + 16);
        migrated.extend_from_slice(HEADERS.join(",").as_bytes());
        migrated.push(b'\n');
        migrated.extend_from_slice(body);

        fs::write(path, migrated)
    }

    /// Make sure the last byte is a line terminator so the next row starts
    /// on its own line
    pub fn ensure_trailing_newline(path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().read(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(());
        }

        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;

        if last[0] != b'\n' && last[0] != b'\r' {
            debug!("Adding missing line terminator to {}", path.display());
            file.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Append one data row
    pub fn append_row(path: &Path, record: &ReadingRecord) -> io::Result<()> {
        let file = OpenOptions::new().append(true).open(path)?;
        let mut writer = row_writer(file);
        writer.write_record(record.to_fields())?;
        writer.flush()?;
        Ok(())
    }

    /// Read every data row in file order, backfilling categories
    pub fn read_records(path: &Path) -> Result<Vec<ReadingRecord>, ReadFailure> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if is_blank(&headers) {
            return Ok(Vec::new());
        }

        let layout = ColumnLayout::from_headers(&headers)?;
        debug!("Reading {} with {:?} schema", path.display(), layout.version());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if is_blank(&row) {
                continue;
            }
            let line = row.position().map(|position| position.line()).unwrap_or_default();
            records.push(layout.parse_row(&row, line)?);
        }

        Ok(records)
    }

    /// Whether a new or existing file at `path` could be written.
    ///
    /// When neither the file nor its directory exist yet, the nearest existing
    /// ancestor decides, since that is where directories would be created.
    pub fn is_writable(path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(metadata) => {
                if !metadata.is_file() {
                    return Ok(false);
                }
                Ok(OpenOptions::new().append(true).open(path).is_ok())
            }
            // Not found, or an ancestor is not a directory
            Err(_) => {
                let parent = parent_dir(path).unwrap_or_else(|| Path::new("."));
                match nearest_existing(parent) {
                    Some(ancestor) => Ok(ancestor.is_dir() && access(ancestor.as_path(), AccessFlags::W_OK).is_ok()),
                    None => Ok(false),
                }
            }
        }
    }
}

fn row_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Parent directory of a file path, treating a bare file name as the
/// current directory
fn parent_dir(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(Path::new(".")),
        other => other,
    }
}

/// Offset of the first byte after the header line. `\n`, `\r\n` and a lone
/// `\r` all end a line.
fn header_end(contents: &[u8]) -> usize {
    match contents.iter().position(|&byte| byte == b'\n' || byte == b'\r') {
        Some(end) if contents[end] == b'\r' && contents.get(end + 1) == Some(&b'\n') => end + 2,
        Some(end) => end + 1,
        None => contents.len(),
    }
}

fn nearest_existing(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| candidate.exists() || candidate.is_symlink())
        .map(Path::to_path_buf)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_uninitialized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");

        assert!(CsvFile::is_uninitialized(&path).unwrap());

        fs::write(&path, "").unwrap();
        assert!(CsvFile::is_uninitialized(&path).unwrap());

        fs::write(&path, "Date\n").unwrap();
        assert!(!CsvFile::is_uninitialized(&path).unwrap());
    }

    #[test]
    fn test_write_header_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("readings.csv");

        CsvFile::write_header(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Time,Systolic,Diastolic,BPM,Category\n"
        );
        assert_eq!(CsvFile::schema_version(&path).unwrap(), SchemaVersion::Current);
    }

    #[test]
    fn test_rewrite_header_keeps_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");
        fs::write(
            &path,
            "Date,Time,Systolic,Diastolic,BPM\r\n2024-01-01,08:00:00,120,80,70\r\n2024-01-02,08:00:00,150,95,72",
        )
        .unwrap();
        assert_eq!(CsvFile::schema_version(&path).unwrap(), SchemaVersion::Legacy);

        CsvFile::rewrite_header(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Time,Systolic,Diastolic,BPM,Category\n2024-01-01,08:00:00,120,80,70\r\n2024-01-02,08:00:00,150,95,72"
        );
    }

    #[test]
    fn test_rewrite_header_carriage_return_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");
        fs::write(
            &path,
            "Date,Time,Systolic,Diastolic,BPM\r2024-01-01,08:00:00,120,80,70\r2024-01-02,08:00:00,150,95,72\r",
        )
        .unwrap();

        CsvFile::rewrite_header(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Time,Systolic,Diastolic,BPM,Category\n2024-01-01,08:00:00,120,80,70\r2024-01-02,08:00:00,150,95,72\r"
        );
        assert_eq!(CsvFile::read_records(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_header_end() {
        assert_eq!(header_end(b"a,b\nc"), 4);
        assert_eq!(header_end(b"a,b\r\nc"), 5);
        assert_eq!(header_end(b"a,b\rc"), 4);
        assert_eq!(header_end(b"a,b"), 3);
    }

    #[test]
    fn test_rewrite_header_only_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");
        fs::write(&path, "Date,Time,Systolic,Diastolic,BPM").unwrap();

        CsvFile::rewrite_header(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Time,Systolic,Diastolic,BPM,Category\n"
        );
    }

    #[test]
    fn test_ensure_trailing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");

        fs::write(&path, "a,b").unwrap();
        CsvFile::ensure_trailing_newline(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");

        // Already terminated files are left alone
        CsvFile::ensure_trailing_newline(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");

        fs::write(&path, "a,b\r").unwrap();
        CsvFile::ensure_trailing_newline(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\r");
    }

    #[test]
    fn test_read_records_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");
        fs::write(
            &path,
            "Date,Time,Systolic,Diastolic,BPM,Category\n\n2024-01-01,08:00:00,120,80,70,High-1\n\n",
        )
        .unwrap();

        let records = CsvFile::read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].systolic, 120);
    }

    #[test]
    fn test_read_records_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readings.csv");
        fs::write(&path, "").unwrap();

        assert!(CsvFile::read_records(&path).unwrap().is_empty());
    }

    #[test]
    fn test_is_writable() {
        let temp_dir = TempDir::new().unwrap();

        // Missing file in an existing directory
        let path = temp_dir.path().join("readings.csv");
        assert!(CsvFile::is_writable(&path).unwrap());

        // Existing file
        fs::write(&path, "").unwrap();
        assert!(CsvFile::is_writable(&path).unwrap());

        // Missing directories are created later
        let nested = temp_dir.path().join("a").join("b").join("readings.csv");
        assert!(CsvFile::is_writable(&nested).unwrap());

        // A directory is not a writable file
        assert!(!CsvFile::is_writable(temp_dir.path()).unwrap());

        // A regular file cannot become a directory
        let blocked = path.join("sub").join("readings.csv");
        assert!(!CsvFile::is_writable(&blocked).unwrap());
    }

    #[test]
    fn test_is_writable_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users can write regardless of mode bits
        let privileged = File::create(locked.join("canary")).is_ok();
        if !privileged {
            assert!(!CsvFile::is_writable(&locked.join("readings.csv")).unwrap());
            assert!(!CsvFile::is_writable(&locked.join("sub").join("readings.csv")).unwrap());
        }

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
