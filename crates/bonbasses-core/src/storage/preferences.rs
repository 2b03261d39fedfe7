//! TOML-based user preferences.
//!
//! Stores what the quiz and the settings screen decide:
//! - Quiz answers (question id -> answer text)
//! - Gentle haptics and typing sounds
//! - Selected canvas
//! - Preferred session length
//!
//! Preferences are stored at `~/.config/bonbasses/preferences.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::data_dir;
use crate::entitlement::{CanvasMode, DEFAULT_SESSION_MINUTES};
use crate::error::{PreferencesError, Result};
use crate::platform::PreferencesStore;

/// Serialized to/from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Quiz answers keyed by question id. TOML keys are strings.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default)]
    pub quiz_completed: bool,
    #[serde(default = "default_true")]
    pub gentle_haptics: bool,
    #[serde(default)]
    pub typing_sounds: bool,
    #[serde(default = "default_canvas")]
    pub selected_canvas: String,
    #[serde(default = "default_timer_length")]
    pub timer_length: u32,
}

fn default_true() -> bool {
    true
}
fn default_canvas() -> String {
    CanvasMode::Classic.as_str().into()
}
fn default_timer_length() -> u32 {
    DEFAULT_SESSION_MINUTES
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            answers: BTreeMap::new(),
            quiz_completed: false,
            gentle_haptics: true,
            typing_sounds: false,
            selected_canvas: default_canvas(),
            timer_length: DEFAULT_SESSION_MINUTES,
        }
    }
}

impl Preferences {
    pub fn answer(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id.to_string()).map(String::as_str)
    }

    pub fn save_answer(&mut self, question_id: u32, answer: &str) {
        self.answers.insert(question_id.to_string(), answer.to_string());
    }

    /// Forget the quiz so it runs again.
    pub fn reset_quiz(&mut self) {
        self.answers.clear();
        self.quiz_completed = false;
    }
}

/// Preferences backed by a TOML file.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FilePreferences {
    /// Store at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new() -> Result<Self, PreferencesError> {
        Ok(Self::with_path(data_dir()?.join("preferences.toml")))
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load from disk; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Preferences, PreferencesError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|e| PreferencesError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(source) => Err(PreferencesError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be serialized or written.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let content = toml::to_string_pretty(prefs)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PreferencesError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Load, apply `f`, save.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    pub fn update<F>(&self, f: F) -> Result<(), PreferencesError>
    where
        F: FnOnce(&mut Preferences),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut prefs = self.load()?;
        f(&mut prefs);
        self.save(&prefs)
    }
}

impl PreferencesStore for FilePreferences {
    fn answer(&self, question_id: u32) -> Result<Option<String>> {
        Ok(self.load()?.answer(question_id).map(str::to_string))
    }

    fn gentle_haptics_enabled(&self) -> Result<bool> {
        Ok(self.load()?.gentle_haptics)
    }

    fn typing_sounds_enabled(&self) -> Result<bool> {
        Ok(self.load()?.typing_sounds)
    }

    fn selected_canvas(&self) -> Result<String> {
        Ok(self.load()?.selected_canvas)
    }

    fn set_selected_canvas(&self, canvas: &str) -> Result<()> {
        self.update(|prefs| prefs.selected_canvas = canvas.to_string())?;
        Ok(())
    }

    fn timer_length(&self) -> Result<u32> {
        Ok(self.load()?.timer_length)
    }
}

/// In-process preferences, for hosts that persist elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    inner: Mutex<Preferences>,
}

impl MemoryPreferences {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            inner: Mutex::new(prefs),
        }
    }

    /// Copy of the current values.
    pub fn get(&self) -> Preferences {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn answer(&self, question_id: u32) -> Result<Option<String>> {
        Ok(self.get().answer(question_id).map(str::to_string))
    }

    fn gentle_haptics_enabled(&self) -> Result<bool> {
        Ok(self.get().gentle_haptics)
    }

    fn typing_sounds_enabled(&self) -> Result<bool> {
        Ok(self.get().typing_sounds)
    }

    fn selected_canvas(&self) -> Result<String> {
        Ok(self.get().selected_canvas)
    }

    fn set_selected_canvas(&self, canvas: &str) -> Result<()> {
        let mut prefs = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        prefs.selected_canvas = canvas.to_string();
        Ok(())
    }

    fn timer_length(&self) -> Result<u32> {
        Ok(self.get().timer_length)
    }
}
