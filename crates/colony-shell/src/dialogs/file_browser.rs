//! Directory listing and recursive search backing the add-application
//! dialog. Never panics on filesystem errors.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Name,
    ModifiedAsc,
    ModifiedDesc,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Name => SortMode::ModifiedAsc,
            SortMode::ModifiedAsc => SortMode::ModifiedDesc,
            SortMode::ModifiedDesc => SortMode::Name,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            SortMode::Name => "dialog.add_app.sort.name",
            SortMode::ModifiedAsc => "dialog.add_app.sort.modified_asc",
            SortMode::ModifiedDesc => "dialog.add_app.sort.modified_desc",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileFilter {
    #[default]
    All,
    Executables,
    Scripts,
}

const SCRIPT_EXTENSIONS: &[&str] = &["sh", "bash", "zsh", "fish", "py", "rb", "pl", "lua", "js", "ps1", "bat", "cmd"];
#[cfg(not(unix))]
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "com", "bat", "cmd", "msi"];

impl FileFilter {
    pub fn next(self) -> Self {
        match self {
            FileFilter::All => FileFilter::Executables,
            FileFilter::Executables => FileFilter::Scripts,
            FileFilter::Scripts => FileFilter::All,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            FileFilter::All => "dialog.add_app.filter.all",
            FileFilter::Executables => "dialog.add_app.filter.executables",
            FileFilter::Scripts => "dialog.add_app.filter.scripts",
        }
    }

    /// Whether a regular file passes. Directories are never filtered.
    pub fn accepts(self, path: &Path, meta: &fs::Metadata) -> bool {
        match self {
            FileFilter::All => true,
            FileFilter::Executables => is_executable(path, meta),
            FileFilter::Scripts => has_extension(path, SCRIPT_EXTENSIONS),
        }
    }
}

fn has_extension(path: &Path, list: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| list.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

#[cfg(unix)]
fn is_executable(_path: &Path, meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.is_file() && meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path, meta: &fs::Metadata) -> bool {
    meta.is_file() && has_extension(path, EXECUTABLE_EXTENSIONS)
}

#[derive(Clone, Debug, PartialEq)]
pub struct BrowserEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

impl BrowserEntry {
    fn from_path(path: PathBuf, meta: &fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, is_dir: meta.is_dir(), modified: meta.modified().ok(), path }
    }
}

/// Enumeration failure, shown inside the dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListError {
    Unavailable,
    Unreadable,
}

impl ListError {
    pub fn message(self) -> &'static str {
        match self {
            ListError::Unavailable => "Directory unavailable",
            ListError::Unreadable => "Unable to enumerate directory",
        }
    }

    fn from_io(error: &io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound { ListError::Unavailable } else { ListError::Unreadable }
    }
}

/// Entries of `dir`: directories first, then files passing `filter`, each
/// group ordered by `sort`. A non-empty `query` keeps names containing it
/// (case-insensitive).
pub fn list_directory(dir: &Path, filter: FileFilter, sort: SortMode, query: &str) -> Result<Vec<BrowserEntry>, ListError> {
    let read = fs::read_dir(dir).map_err(|e| {
        debug!(error = %e, dir = %dir.display(), "read_dir failed");
        ListError::from_io(&e)
    })?;
    let needle = query.trim().to_lowercase();
    let mut entries: Vec<BrowserEntry> = read
        .filter_map(Result::ok)
        .filter_map(|e| {
            let path = e.path();
            let meta = fs::metadata(&path).ok()?;
            if !meta.is_dir() && !filter.accepts(&path, &meta) {
                return None;
            }
            Some(BrowserEntry::from_path(path, &meta))
        })
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .collect();
    sort_entries(&mut entries, sort);
    Ok(entries)
}

pub fn sort_entries(entries: &mut [BrowserEntry], sort: SortMode) {
    entries.sort_by(|a, b| {
        b.is_dir.cmp(&a.is_dir).then_with(|| match sort {
            SortMode::Name => by_name(a, b),
            SortMode::ModifiedAsc => a.modified.cmp(&b.modified).then_with(|| by_name(a, b)),
            SortMode::ModifiedDesc => b.modified.cmp(&a.modified).then_with(|| by_name(a, b)),
        })
    });
}

fn by_name(a: &BrowserEntry, b: &BrowserEntry) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name))
}

/// Where a global search starts: the filesystem root of `dir`, or `dir`
/// itself when it has no root component.
pub fn search_root(dir: &Path) -> PathBuf {
    dir.ancestors()
        .last()
        .filter(|root| !root.as_os_str().is_empty() && root.has_root())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.to_path_buf())
}

/// Depth-first walk from `root` collecting files whose name contains
/// `needle`, stopping after `cap` matches. Unreadable entries are skipped.
pub fn global_search(root: &Path, needle: &str, filter: FileFilter, cap: usize) -> Vec<BrowserEntry> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() || cap == 0 {
        return Vec::new();
    }
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().to_lowercase().contains(&needle))
        .filter_map(|e| {
            let meta = e.metadata().ok()?;
            filter.accepts(e.path(), &meta).then(|| BrowserEntry::from_path(e.into_path(), &meta))
        })
        .take(cap)
        .collect()
}
