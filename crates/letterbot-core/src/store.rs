//! Versioned JSON persistence for engine state.
//!
//! One encode/decode pair per entity. Missing files and schema drift are
//! both explicit errors that tell the operator to re-initialize rather
//! than silently rebuilding partial state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LetterError;
use crate::frame::{WorkingState, STATE_VERSION};
use crate::run::RunState;

const WORKING_FILE: &str = "working_letter.json";
const RUN_FILE: &str = "run_state.json";

/// Directory-scoped store for working and run state plus finished
/// letters.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_working(&self, state: &WorkingState) -> Result<(), LetterError> {
        self.save(WORKING_FILE, state)
    }

    pub fn load_working(&self) -> Result<WorkingState, LetterError> {
        let state: WorkingState = self.load(WORKING_FILE)?;
        self.check_version(WORKING_FILE, state.version)?;
        Ok(state)
    }

    pub fn save_run(&self, state: &RunState) -> Result<(), LetterError> {
        self.save(RUN_FILE, state)
    }

    pub fn load_run(&self) -> Result<RunState, LetterError> {
        let state: RunState = self.load(RUN_FILE)?;
        self.check_version(RUN_FILE, state.version)?;
        Ok(state)
    }

    /// Write a composed letter beside the state files. Returns the full
    /// path.
    pub fn write_letter(&self, file_name: &str, html: &str) -> Result<PathBuf, LetterError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, html)?;
        Ok(path)
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), LetterError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value).map_err(|err| {
            LetterError::StateCorrupt {
                path: path.display().to_string(),
                detail: err.to_string(),
            }
        })?;
        fs::write(&path, json)?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, LetterError> {
        let path = self.dir.join(name);
        let content = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                LetterError::StateMissing {
                    path: path.display().to_string(),
                }
            } else {
                LetterError::Io(err)
            }
        })?;
        serde_json::from_str(&content).map_err(|err| LetterError::StateCorrupt {
            path: path.display().to_string(),
            detail: err.to_string(),
        })
    }

    fn check_version(&self, name: &str, version: u32) -> Result<(), LetterError> {
        if version != STATE_VERSION {
            return Err(LetterError::StateCorrupt {
                path: self.dir.join(name).display().to_string(),
                detail: format!("unsupported state version {version}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ChangeFrame;
    use crate::template::Template;

    fn sample_working() -> WorkingState {
        WorkingState::new(
            "Job Application",
            "templates/job_application.txt",
            Template::default(),
            ChangeFrame::new(),
        )
    }

    #[test]
    fn working_state_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());

        let state = sample_working();
        store.save_working(&state).unwrap();
        let loaded = store.load_working().unwrap();

        assert_eq!(loaded.title, state.title);
        assert_eq!(loaded.version, STATE_VERSION);
        assert!(loaded.bindings.is_empty());
    }

    #[test]
    fn run_state_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());

        let mut run = RunState::new(vec!["a.txt".into(), "b.txt".into()]);
        run.pass = 3;
        run.cursor = Some("17".into());
        store.save_run(&run).unwrap();

        assert_eq!(store.load_run().unwrap(), run);
    }

    #[test]
    fn missing_state_is_explicit() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());

        let err = store.load_run().unwrap_err();
        assert!(matches!(err, LetterError::StateMissing { .. }));
        assert!(err.to_string().contains("letterbot init"));
    }

    #[test]
    fn garbage_state_is_corrupt_not_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());
        fs::write(tmp.path().join(RUN_FILE), "not json at all").unwrap();

        let err = store.load_run().unwrap_err();
        assert!(matches!(err, LetterError::StateCorrupt { .. }));
    }

    #[test]
    fn version_drift_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());

        let mut run = RunState::new(Vec::new());
        run.version = 99;
        store.save_run(&run).unwrap();

        let err = store.load_run().unwrap_err();
        assert!(matches!(err, LetterError::StateCorrupt { .. }));
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn letters_written_beside_state() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());

        let path = store
            .write_letter("Job_Application_01_02_26.txt", "<p>hello</p>")
            .unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<p>hello</p>");
    }
}
