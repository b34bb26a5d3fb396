//! In-memory test doubles shared by the core unit tests.

use super::fs::{FileStat, FileSystem, WalkEntry, WalkError};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

struct FakeFile {
    contents: Vec<u8>,
    modified: SystemTime,
}

#[derive(Default)]
struct FakeState {
    files: BTreeMap<PathBuf, FakeFile>,
    dirs: BTreeSet<PathBuf>,
    walk_errors: Vec<PathBuf>,
    stat_failures: HashSet<PathBuf>,
    open_failures: HashSet<PathBuf>,
    rename_failures: HashSet<PathBuf>,
    fail_create_dir: bool,
    renames: Vec<(PathBuf, PathBuf)>,
    created_dirs: Vec<(PathBuf, u32)>,
}

/// [`FileSystem`] that keeps everything in a map
#[derive(Default)]
pub(crate) struct FakeFileSystem {
    state: Mutex<FakeState>,
}

/// Timestamp `secs` seconds after the epoch
pub(crate) fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

impl FakeFileSystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_dir(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().dirs.insert(path.into());
    }

    pub(crate) fn add_file(&self, path: impl Into<PathBuf>, contents: &[u8]) {
        self.add_file_with_mtime(path, contents, at(1_000));
    }

    pub(crate) fn add_file_with_mtime(
        &self,
        path: impl Into<PathBuf>,
        contents: &[u8],
        modified: SystemTime,
    ) {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            state.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        state.files.insert(
            path,
            FakeFile {
                contents: contents.to_vec(),
                modified,
            },
        );
    }

    pub(crate) fn fail_stat(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().stat_failures.insert(path.into());
    }

    pub(crate) fn fail_open(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().open_failures.insert(path.into());
    }

    pub(crate) fn fail_rename(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().rename_failures.insert(path.into());
    }

    pub(crate) fn fail_create_dir(&self) {
        self.state.lock().unwrap().fail_create_dir = true;
    }

    /// Report an unreadable entry during walks
    pub(crate) fn add_walk_error(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().walk_errors.push(path.into());
    }

    pub(crate) fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    pub(crate) fn file_paths(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    pub(crate) fn renames(&self) -> Vec<(PathBuf, PathBuf)> {
        self.state.lock().unwrap().renames.clone()
    }

    pub(crate) fn created_dirs(&self) -> Vec<(PathBuf, u32)> {
        self.state.lock().unwrap().created_dirs.clone()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

impl FileSystem for FakeFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let state = self.state.lock().unwrap();
        if state.open_failures.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "open refused"));
        }
        let file = state.files.get(path).ok_or_else(|| not_found(path))?;
        Ok(Box::new(Cursor::new(file.contents.clone())))
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let state = self.state.lock().unwrap();
        if state.stat_failures.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "stat refused"));
        }
        let file = state.files.get(path).ok_or_else(|| not_found(path))?;
        Ok(FileStat {
            modified: file.modified,
            size: file.contents.len() as u64,
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.rename_failures.contains(from) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "rename refused"));
        }
        let file = state.files.remove(from).ok_or_else(|| not_found(from))?;
        state.files.insert(to.to_path_buf(), file);
        state.renames.push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create_dir {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "mkdir refused"));
        }
        state.dirs.insert(path.to_path_buf());
        state.created_dirs.push((path.to_path_buf(), mode));
        Ok(())
    }

    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Result<WalkEntry, WalkError>),
    ) -> io::Result<()> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains(root) {
            return Err(not_found(root));
        }

        for dir in state.dirs.iter().filter(|d| d.starts_with(root)) {
            visit(Ok(WalkEntry {
                path: dir.clone(),
                is_file: false,
                size: 0,
            }));
        }
        for (path, file) in state.files.iter().filter(|(p, _)| p.starts_with(root)) {
            visit(Ok(WalkEntry {
                path: path.clone(),
                is_file: true,
                size: file.contents.len() as u64,
            }));
        }
        for path in state.walk_errors.iter().filter(|p| p.starts_with(root)) {
            visit(Err(WalkError {
                path: Some(path.clone()),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            }));
        }

        Ok(())
    }
}
