use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a modules.json read may take before it is abandoned.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ModulesError {
    #[error("failed to open module metadata: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse module metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One entry of the hub's `modules.json` metadata file, deserialized verbatim.
/// Pure data, no behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallModule {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub download_url: Option<String>,
    pub category: Option<String>,
    pub installed_size: Option<serde_json::Value>,
    pub download_size: Option<serde_json::Value>,
    pub visible: bool,
    pub selected: bool,
    pub destination: Option<String>,
    pub checksum: Option<String>,
    pub sync: Option<String>,
    pub parent: Option<String>,
    pub eula_url_1: Option<String>,
    pub eula_label_1: Option<String>,
    pub eula_message: Option<String>,
    pub rename_to: Option<String>,
    pub rename_from: Option<String>,
}

/// Read `modules.json` from an installation root, giving up after a bounded
/// wait. The read runs on a helper thread; on timeout the thread is abandoned
/// and the module list is simply treated as unavailable. Best-effort
/// enrichment, never an error for the caller.
pub fn read_modules(install_root: &Path) -> Option<Vec<InstallModule>> {
    let path = install_root.join("modules.json");
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(load_modules(&path));
    });

    match receiver.recv_timeout(READ_TIMEOUT) {
        Ok(Ok(modules)) => Some(modules),
        Ok(Err(err)) => {
            log::debug!("Module metadata unavailable: {}", err);
            None
        }
        Err(_) => {
            log::debug!("Timed out reading module metadata from {:?}", install_root);
            None
        }
    }
}

fn load_modules(path: &Path) -> Result<Vec<InstallModule>, ModulesError> {
    let file = File::open(path)?;
    let modules = serde_json::from_reader(BufReader::new(file))?;
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn deserializes_module_metadata() {
        let json = r#"[
            {
                "id": "android",
                "name": "Android Build Support",
                "downloadUrl": "https://example.invalid/android.zip",
                "category": "Platforms",
                "installedSize": 1885331000,
                "downloadSize": 622000000,
                "visible": true,
                "selected": false,
                "parent": null
            },
            {
                "id": "android-sdk-ndk-tools",
                "name": "Android SDK & NDK Tools",
                "parent": "android"
            }
        ]"#;
        let modules: Vec<InstallModule> = serde_json::from_str(json).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].id.as_deref(), Some("android"));
        assert!(modules[0].visible);
        assert_eq!(modules[1].parent.as_deref(), Some("android"));
        assert_eq!(modules[1].download_url, None);
    }

    #[test]
    fn reads_modules_beside_installation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("modules.json"),
            r#"[{"id": "webgl", "name": "WebGL Build Support", "visible": true}]"#,
        )
        .unwrap();
        let modules = read_modules(dir.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].id.as_deref(), Some("webgl"));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_modules(dir.path()).is_none());
    }

    #[test]
    fn malformed_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("modules.json"), "not json").unwrap();
        assert!(read_modules(dir.path()).is_none());
    }
}
