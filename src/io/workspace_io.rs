use std::fs;
use std::io::Write;
use std::path::Path;

use crate::store::Workspace;

pub const WORKSPACE_FILE: &str = "workspace.json";

/// Error type for workspace file I/O
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceIoError {
    #[error("no workspace found at {0} (run `canopy init`)")]
    NotFound(String),
    #[error("failed to read workspace: {0}")]
    Io(#[from] std::io::Error),
    #[error("workspace file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Load workspace.json from the given directory
pub fn load_workspace(dir: &Path) -> Result<Workspace, WorkspaceIoError> {
    let path = dir.join(WORKSPACE_FILE);
    if !path.exists() {
        return Err(WorkspaceIoError::NotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save workspace.json atomically: write to a temp file in the same
/// directory, then rename over the target.
pub fn save_workspace(dir: &Path, ws: &Workspace) -> Result<(), WorkspaceIoError> {
    let path = dir.join(WORKSPACE_FILE);
    let content = serde_json::to_string_pretty(ws)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(())
}

/// Whether the directory holds an initialized workspace
pub fn workspace_exists(dir: &Path) -> bool {
    dir.join(WORKSPACE_FILE).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::entity_ops::{create_list, create_task};
    use tempfile::TempDir;

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::new();
        create_list(&mut ws, "Work".into(), None).unwrap();
        create_task(&mut ws, "Report".into(), "L-001").unwrap();

        save_workspace(dir.path(), &ws).unwrap();
        let loaded = load_workspace(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("T-001").unwrap().title, "Report");
        // Store order survives the round trip
        let ids: Vec<&str> = loaded.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["L-001", "T-001"]);
    }

    #[test]
    fn load_missing_workspace_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_workspace(dir.path()),
            Err(WorkspaceIoError::NotFound(_))
        ));
    }

    #[test]
    fn load_corrupt_workspace_reports_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(WORKSPACE_FILE), "{broken").unwrap();
        assert!(matches!(
            load_workspace(dir.path()),
            Err(WorkspaceIoError::Corrupt(_))
        ));
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::new();
        create_list(&mut ws, "First".into(), None).unwrap();
        save_workspace(dir.path(), &ws).unwrap();

        create_list(&mut ws, "Second".into(), None).unwrap();
        save_workspace(dir.path(), &ws).unwrap();
        assert_eq!(load_workspace(dir.path()).unwrap().len(), 2);
    }
}
