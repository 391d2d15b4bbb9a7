//! Learner progress.
//!
//! `ProgressStore` owns the state and pushes a snapshot to its backend after
//! every change. Persistence is best effort: a failed save is logged and the
//! in-memory state stays authoritative.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog;
use crate::error::{AppError, Result};

/// Scroll depth at which a section counts as read.
pub const SCROLL_COMPLETE_FRACTION: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub answer: usize,
    pub correct: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    pub completed_sections: BTreeSet<String>,
    pub current_module: Option<String>,
    pub current_section: Option<String>,
    /// Seconds per section id.
    pub time_spent: BTreeMap<String, u64>,
    pub quiz_answers: BTreeMap<String, QuizAnswer>,
    pub dev_mode: bool,
}

pub trait ProgressBackend: Send + Sync {
    fn load(&self) -> Result<Option<ProgressState>>;
    fn save(&self, state: &ProgressState) -> Result<()>;
}

pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<ProgressState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps the snapshot in memory; clones share it.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    snapshot: Arc<Mutex<Option<ProgressState>>>,
}

impl MemoryBackend {
    pub fn snapshot(&self) -> Option<ProgressState> {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProgressBackend for MemoryBackend {
    fn load(&self) -> Result<Option<ProgressState>> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        *self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(state.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: &'static str,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(flatten)]
    pub state: ProgressState,
    pub overall_percent: u8,
    pub total_time: u64,
    pub modules: Vec<ModuleProgress>,
    pub unlocked_sections: Vec<&'static str>,
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (done * 100 / total) as u8
}

pub struct ProgressStore {
    backend: Box<dyn ProgressBackend>,
    state: ProgressState,
}

impl ProgressStore {
    pub fn open(backend: impl ProgressBackend + 'static) -> Self {
        let state = match backend.load() {
            Ok(Some(state)) => state,
            Ok(None) => ProgressState::default(),
            Err(e) => {
                warn!("Discarding unreadable progress: {}", e);
                ProgressState::default()
            }
        };
        Self {
            backend: Box::new(backend),
            state,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    fn persist(&self) {
        if let Err(e) = self.backend.save(&self.state) {
            warn!("Failed to save progress: {}", e);
        }
    }

    pub fn mark_complete(&mut self, section_id: &str) -> Result<()> {
        let (_, section) = catalog::section(section_id)?;
        if self.state.completed_sections.insert(section.id.to_string()) {
            debug!("Section {} completed", section.id);
            self.persist();
        }
        Ok(())
    }

    pub fn set_position(&mut self, section_id: &str) -> Result<()> {
        let (module, section) = catalog::section(section_id)?;
        self.state.current_module = Some(module.id.to_string());
        self.state.current_section = Some(section.id.to_string());
        self.persist();
        Ok(())
    }

    pub fn add_time(&mut self, section_id: &str, seconds: u64) -> Result<u64> {
        let (_, section) = catalog::section(section_id)?;
        let spent = self
            .state
            .time_spent
            .entry(section.id.to_string())
            .or_insert(0);
        *spent = spent.saturating_add(seconds);
        let total = *spent;
        self.persist();
        Ok(total)
    }

    /// Returns whether the section is complete after this update.
    pub fn record_scroll(&mut self, section_id: &str, fraction: f64) -> Result<bool> {
        catalog::section(section_id)?;
        if fraction >= SCROLL_COMPLETE_FRACTION {
            self.mark_complete(section_id)?;
        }
        Ok(self.state.completed_sections.contains(section_id))
    }

    pub fn record_quiz(&mut self, outcome: &catalog::QuizOutcome) -> Result<()> {
        self.state.quiz_answers.insert(
            outcome.section_id.clone(),
            QuizAnswer {
                answer: outcome.answer,
                correct: outcome.correct,
            },
        );
        if outcome.correct {
            self.state
                .completed_sections
                .insert(outcome.section_id.clone());
        }
        self.persist();
        Ok(())
    }

    pub fn set_dev_mode(&mut self, enabled: bool) {
        self.state.dev_mode = enabled;
        self.persist();
    }

    pub fn reset(&mut self) {
        self.state = ProgressState::default();
        self.persist();
    }

    pub fn is_unlocked(&self, section_id: &str) -> Result<bool> {
        catalog::section(section_id)?;
        if self.state.dev_mode || self.state.completed_sections.contains(section_id) {
            return Ok(true);
        }
        Ok(match catalog::previous_section(section_id)? {
            None => true,
            Some(prev) => self.state.completed_sections.contains(prev.id),
        })
    }

    pub fn module_progress(&self, module_id: &str) -> Result<ModuleProgress> {
        let module = catalog::module(module_id)?;
        let completed = module
            .sections
            .iter()
            .filter(|s| self.state.completed_sections.contains(s.id))
            .count();
        Ok(ModuleProgress {
            module_id: module.id,
            completed,
            total: module.sections.len(),
            percent: percent(completed, module.sections.len()),
        })
    }

    pub fn overall_percent(&self) -> u8 {
        let completed = catalog::ordered_sections()
            .filter(|s| self.state.completed_sections.contains(s.id))
            .count();
        percent(completed, catalog::total_sections())
    }

    pub fn total_time(&self) -> u64 {
        self.state
            .time_spent
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(*s))
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            state: self.state.clone(),
            overall_percent: self.overall_percent(),
            total_time: self.total_time(),
            modules: catalog::modules()
                .iter()
                .filter_map(|m| self.module_progress(m.id).ok())
                .collect(),
            unlocked_sections: catalog::ordered_sections()
                .filter(|s| self.is_unlocked(s.id).unwrap_or(false))
                .map(|s| s.id)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (ProgressStore, MemoryBackend) {
        let backend = MemoryBackend::default();
        (ProgressStore::open(backend.clone()), backend)
    }

    #[test]
    fn test_starts_empty() {
        let (store, backend) = store();
        assert_eq!(store.state(), &ProgressState::default());
        assert_eq!(store.overall_percent(), 0);
        assert!(backend.snapshot().is_none());
    }

    #[test]
    fn test_mark_complete_persists() {
        let (mut store, backend) = store();
        store.mark_complete("what-is-llm").unwrap();
        assert!(backend
            .snapshot()
            .unwrap()
            .completed_sections
            .contains("what-is-llm"));

        assert!(matches!(
            store.mark_complete("missing"),
            Err(AppError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_position_tracks_module() {
        let (mut store, _) = store();
        store.set_position("quality-bar").unwrap();
        assert_eq!(store.state().current_module.as_deref(), Some("framework"));
        assert_eq!(store.state().current_section.as_deref(), Some("quality-bar"));
    }

    #[test]
    fn test_time_accumulates() {
        let (mut store, _) = store();
        assert_eq!(store.add_time("what-is-llm", 30).unwrap(), 30);
        assert_eq!(store.add_time("what-is-llm", 15).unwrap(), 45);
        store.add_time("quality-bar", 10).unwrap();
        assert_eq!(store.total_time(), 55);
        assert_eq!(store.add_time("what-is-llm", u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn test_scroll_completes_near_bottom() {
        let (mut store, _) = store();
        assert!(!store.record_scroll("what-is-llm", 0.5).unwrap());
        assert!(store.record_scroll("what-is-llm", 0.95).unwrap());
        // scrolling back up keeps the section complete
        assert!(store.record_scroll("what-is-llm", 0.1).unwrap());
    }

    #[test]
    fn test_quiz_answers() {
        let (mut store, _) = store();
        let wrong = catalog::check_quiz("role-and-goal", 0).unwrap();
        store.record_quiz(&wrong).unwrap();
        assert!(!store.state().completed_sections.contains("role-and-goal"));

        let right = catalog::check_quiz("role-and-goal", 1).unwrap();
        store.record_quiz(&right).unwrap();
        assert!(store.state().completed_sections.contains("role-and-goal"));
        assert_eq!(
            store.state().quiz_answers["role-and-goal"],
            QuizAnswer {
                answer: 1,
                correct: true
            }
        );
    }

    #[test]
    fn test_unlocking() {
        let (mut store, _) = store();
        assert!(store.is_unlocked("what-is-llm").unwrap());
        assert!(!store.is_unlocked("tokens-and-context").unwrap());

        store.mark_complete("what-is-llm").unwrap();
        assert!(store.is_unlocked("tokens-and-context").unwrap());
        assert!(!store.is_unlocked("context-rescue").unwrap());

        store.set_dev_mode(true);
        assert!(store.is_unlocked("workflow-builder").unwrap());
        assert_eq!(
            store.snapshot().unlocked_sections.len(),
            catalog::total_sections()
        );
    }

    #[test]
    fn test_percentages() {
        let (mut store, _) = store();
        store.mark_complete("prompt-chains").unwrap();
        let module = store.module_progress("workflows").unwrap();
        assert_eq!(module.completed, 1);
        assert_eq!(module.total, 2);
        assert_eq!(module.percent, 50);
        assert_eq!(store.overall_percent(), 11);
    }

    #[test]
    fn test_reset() {
        let (mut store, backend) = store();
        store.mark_complete("what-is-llm").unwrap();
        store.set_dev_mode(true);
        store.reset();
        assert_eq!(store.state(), &ProgressState::default());
        assert_eq!(backend.snapshot(), Some(ProgressState::default()));
    }

    #[test]
    fn test_reopen_from_backend() {
        let backend = MemoryBackend::default();
        let mut store = ProgressStore::open(backend.clone());
        store.mark_complete("what-is-llm").unwrap();

        let reopened = ProgressStore::open(backend);
        assert!(reopened.state().completed_sections.contains("what-is-llm"));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.json");

        let mut store = ProgressStore::open(JsonFileBackend::new(&path));
        store.add_time("quality-bar", 42).unwrap();
        store.set_dev_mode(true);
        assert!(path.exists());

        let reopened = ProgressStore::open(JsonFileBackend::new(&path));
        assert_eq!(reopened.state().time_spent["quality-bar"], 42);
        assert!(reopened.state().dev_mode);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{ not json").unwrap();

        let store = ProgressStore::open(JsonFileBackend::new(&path));
        assert_eq!(store.state(), &ProgressState::default());
    }
}
