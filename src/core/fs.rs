//! Filesystem capability used by the pipeline.
//!
//! Every component that touches the disk (scanner, hasher, keep policies,
//! trash strategy) goes through [`FileSystem`], so tests can substitute an
//! in-memory implementation and the production build uses [`StdFileSystem`].

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Metadata the pipeline needs about a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Last modification time
    pub modified: SystemTime,
    /// Size in bytes
    pub size: u64,
}

/// One entry produced by a directory walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry
    pub path: PathBuf,
    /// True for regular files (directories and other kinds are false)
    pub is_file: bool,
    /// Size in bytes (0 for non-files)
    pub size: u64,
}

/// A non-fatal failure on a single entry below the walk root
#[derive(Debug)]
pub struct WalkError {
    /// Entry that could not be read, when known
    pub path: Option<PathBuf>,
    /// Underlying I/O error
    pub source: io::Error,
}

impl std::fmt::Display for WalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

/// Narrow filesystem contract consumed by the core.
pub trait FileSystem: Send + Sync {
    /// Open a file for reading
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;

    /// Read size and modification time
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Rename (move) a file
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a directory and all missing parents with the given mode
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Walk `root` recursively, calling `visit` for every entry.
    ///
    /// Failures below the root are passed to `visit` and the walk goes on.
    /// Failure to read the root itself is returned as `Err`.
    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Result<WalkEntry, WalkError>),
    ) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs` and walkdir
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(io::BufReader::new(file)))
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = fs::metadata(path)?;
        Ok(FileStat {
            modified: metadata.modified()?,
            size: metadata.len(),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    #[cfg(unix)]
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().recursive(true).mode(mode).create(path)
    }

    #[cfg(not(unix))]
    fn create_dir_all(&self, path: &Path, _mode: u32) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Result<WalkEntry, WalkError>),
    ) -> io::Result<()> {
        // The root must be readable; anything below it is best effort
        let root_meta = fs::metadata(root)?;
        if !root_meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        for entry_result in WalkDir::new(root).follow_links(false) {
            match entry_result {
                Ok(entry) => {
                    let is_file = entry.file_type().is_file();
                    let size = if is_file {
                        match entry.metadata() {
                            Ok(metadata) => metadata.len(),
                            Err(e) => {
                                visit(Err(WalkError {
                                    path: Some(entry.path().to_path_buf()),
                                    source: into_io_error(e),
                                }));
                                continue;
                            }
                        }
                    } else {
                        0
                    };

                    visit(Ok(WalkEntry {
                        path: entry.into_path(),
                        is_file,
                        size,
                    }));
                }
                Err(e) => {
                    if e.depth() == 0 {
                        return Err(into_io_error(e));
                    }
                    visit(Err(WalkError {
                        path: e.path().map(Path::to_path_buf),
                        source: into_io_error(e),
                    }));
                }
            }
        }

        Ok(())
    }
}

fn into_io_error(error: walkdir::Error) -> io::Error {
    let kind = error
        .io_error()
        .map(|e| e.kind())
        .unwrap_or(io::ErrorKind::Other);
    io::Error::new(kind, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn walk_reports_files_with_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_file(temp_dir.path(), "a.jpg", b"1234");
        write_file(&nested, "b.png", b"12");

        let mut files = Vec::new();
        StdFileSystem::new()
            .walk(temp_dir.path(), &mut |entry| {
                let entry = entry.unwrap();
                if entry.is_file {
                    files.push((entry.path.file_name().unwrap().to_owned(), entry.size));
                }
            })
            .unwrap();

        files.sort();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].1, 4);
        assert_eq!(files[1].1, 2);
    }

    #[test]
    fn walk_of_missing_root_is_an_error() {
        let result = StdFileSystem::new().walk(Path::new("/nonexistent/path/12345"), &mut |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn walk_of_file_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_file(temp_dir.path(), "a.jpg", b"x");

        let result = StdFileSystem::new().walk(&file, &mut |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn stat_reads_size() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_file(temp_dir.path(), "a.jpg", b"hello");

        let stat = StdFileSystem::new().stat(&file).unwrap();
        assert_eq!(stat.size, 5);
    }

    #[test]
    fn create_dir_all_and_rename() {
        let temp_dir = TempDir::new().unwrap();
        let fs_impl = StdFileSystem::new();
        let file = write_file(temp_dir.path(), "a.jpg", b"hello");
        let target_dir = temp_dir.path().join("trash").join("deep");

        fs_impl.create_dir_all(&target_dir, 0o755).unwrap();
        fs_impl.rename(&file, &target_dir.join("a.jpg")).unwrap();

        assert!(!file.exists());
        assert!(target_dir.join("a.jpg").exists());
    }

    #[test]
    fn open_reads_contents() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_file(temp_dir.path(), "a.jpg", b"hello");

        let mut contents = String::new();
        StdFileSystem::new()
            .open(&file)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "hello");
    }
}
