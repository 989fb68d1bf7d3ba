use crate::error::StoreError;
use crate::model::{ResolvedDueFields, TaskRecord};
use directories::ProjectDirs;
use fs2::FileExt;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

pub const TASKS_FILE: &str = "tasks.json";

/// Local persistence of task records, keyed by local task identity.
pub trait TaskStore: Send + Sync {
    fn list(&self) -> Result<Vec<TaskRecord>, StoreError>;

    fn get(&self, id: Uuid) -> Result<Option<TaskRecord>, StoreError>;

    /// Overwrites due-date, due-datetime, is-recurring and deadline of one task in a
    /// single atomic write. Returns `false` without writing when the task is gone.
    fn write_due_fields(&self, id: Uuid, fields: &ResolvedDueFields) -> Result<bool, StoreError>;
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// JSON file store. Every read-modify-write holds an exclusive lock on a sidecar
/// `.lock` file, and the data file is replaced by rename.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TASKS_FILE))
    }

    /// `DUELINE_DATA_DIR` wins over the platform data directory.
    pub fn default_data_dir() -> Option<PathBuf> {
        if let Ok(dir) = env::var("DUELINE_DATA_DIR")
            && !dir.is_empty()
        {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("com", "dueline", "dueline").map(|proj| proj.data_dir().to_path_buf())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents).map_err(io_error(&tmp_path))?;
        fs::rename(&tmp_path, path).map_err(io_error(path))?;
        Ok(())
    }

    /// Runs `f` while holding an exclusive lock associated with `path`.
    pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> Result<T, StoreError>,
    {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(io_error(&lock_path))?;
        lock_file.lock_exclusive().map_err(io_error(&lock_path))?;
        let result = f();
        let _ = FileExt::unlock(&lock_file);
        result
    }

    fn load_internal(&self) -> Result<Vec<TaskRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let json = fs::read_to_string(&self.path).map_err(io_error(&self.path))?;
        if json.trim().is_empty() {
            return Ok(vec![]);
        }
        Ok(serde_json::from_str(&json)?)
    }

    pub fn load(&self) -> Result<Vec<TaskRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(&self.path, || self.load_internal())
    }

    pub fn save(&self, tasks: &[TaskRecord]) -> Result<(), StoreError> {
        Self::with_lock(&self.path, || {
            let json = serde_json::to_string_pretty(tasks)?;
            Self::atomic_write(&self.path, json)
        })
    }

    /// Transactional modification of the stored tasks.
    /// Locks -> Loads -> Applies Closure -> Saves -> Unlocks.
    pub fn modify<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<TaskRecord>) -> T,
    {
        Self::with_lock(&self.path, || {
            let mut tasks = self.load_internal()?;
            let out = f(&mut tasks);
            let json = serde_json::to_string_pretty(&tasks)?;
            Self::atomic_write(&self.path, json)?;
            Ok(out)
        })
    }

    /// Inserts a task, replacing any record with the same id.
    pub fn upsert(&self, task: TaskRecord) -> Result<(), StoreError> {
        self.modify(|tasks| match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        })
    }

    pub fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        self.modify(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            tasks.len() != before
        })
    }
}

impl TaskStore for LocalStorage {
    fn list(&self) -> Result<Vec<TaskRecord>, StoreError> {
        self.load()
    }

    fn get(&self, id: Uuid) -> Result<Option<TaskRecord>, StoreError> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    fn write_due_fields(&self, id: Uuid, fields: &ResolvedDueFields) -> Result<bool, StoreError> {
        Self::with_lock(&self.path, || {
            let mut tasks = self.load_internal()?;
            let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
                return Ok(false);
            };
            task.apply_due_fields(fields);
            let json = serde_json::to_string_pretty(&tasks)?;
            Self::atomic_write(&self.path, json)?;
            Ok(true)
        })
    }
}

/// In-process store; a single mutex makes each write atomic for readers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<TaskRecord>>,
}

impl MemoryStore {
    pub fn new(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    pub fn insert(&self, task: TaskRecord) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().map_err(|_| StoreError::Poisoned)?;
        tasks.retain(|t| t.id != task.id);
        tasks.push(task);
        Ok(())
    }

    pub fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.lock().map_err(|_| StoreError::Poisoned)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Result<Vec<TaskRecord>, StoreError> {
        Ok(self.tasks.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<TaskRecord>, StoreError> {
        let tasks = self.tasks.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    fn write_due_fields(&self, id: Uuid, fields: &ResolvedDueFields) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.lock().map_err(|_| StoreError::Poisoned)?;
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.apply_due_fields(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
