use std::fs;
use std::path::{Path, PathBuf};

const VERSION_FILE_KEY: &str = "m_EditorVersionWithRevision";

/// A Unity project directory and the editor version it declares.
#[derive(Debug, Clone)]
pub struct Project {
    path: PathBuf,
    version: Option<String>,
    changeset: Option<String>,
}

impl Project {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (version, changeset) = read_declared_version(&path);
        log::debug!(
            "Unity project {:?} seems to be using Unity version {:?}",
            path,
            version
        );
        Self {
            path,
            version,
            changeset,
        }
    }

    /// Check if this looks like a valid Unity project. Independent of whether
    /// a version could actually be parsed out of the version file.
    pub fn is_valid(&self) -> bool {
        self.path.is_dir() && version_file_path(&self.path).is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn changeset(&self) -> Option<&str> {
        self.changeset.as_deref()
    }
}

fn version_file_path(project_path: &Path) -> PathBuf {
    project_path.join("ProjectSettings").join("ProjectVersion.txt")
}

/// Scan ProjectVersion.txt for the one key this tool cares about. The file is
/// a foreign, unversioned format, so lines that don't match the expected
/// `key: version (changeset)` shape are skipped rather than rejected.
fn read_declared_version(project_path: &Path) -> (Option<String>, Option<String>) {
    let file = version_file_path(project_path);
    if !project_path.is_dir() || !file.is_file() {
        return (None, None);
    }
    let Ok(contents) = fs::read_to_string(&file) else {
        return (None, None);
    };

    for line in contents.lines() {
        let key_value: Vec<&str> = line.split(':').collect();
        if key_value.len() != 2 {
            continue;
        }
        if key_value[0].trim() != VERSION_FILE_KEY {
            continue;
        }

        let tokens: Vec<&str> = key_value[1].trim().split(' ').collect();
        if tokens.len() != 2 {
            continue;
        }

        let version = tokens[0].trim().to_string();
        let changeset = tokens[1].replace('(', "").replace(')', "").trim().to_string();
        return (Some(version), Some(changeset));
    }

    (None, None)
}
