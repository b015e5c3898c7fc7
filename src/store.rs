use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::StoreError;
use crate::model::{Answer, Category, Level, Player, Question, Record};

// ---------------------------------------------------------------------------
// Record store contract
// ---------------------------------------------------------------------------

/// Request/response access to one entity kind. Every operation is fallible.
pub trait RecordStore<T: Record> {
    fn list(&self) -> Result<Vec<T>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    /// Insert a record. Re-adding an id that is already stored is a no-op.
    fn add(&self, record: T) -> Result<(), StoreError>;

    /// Replace a stored record; `NotFound` if its id is unknown.
    fn update(&self, record: T) -> Result<(), StoreError>;

    /// Remove every listed id that exists. Returns how many were removed.
    fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError>;

    fn filter(&self, pred: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        Ok(self.list()?.into_iter().filter(|r| pred(r)).collect())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// One JSON file per entity kind holding an object keyed by record id.
/// A missing file reads as an empty collection.
pub struct JsonStore<T> {
    path: PathBuf,
    _kind: PhantomData<T>,
}

impl<T: Record> JsonStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _kind: PhantomData,
        }
    }

    /// `<dir>/<kind>s.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}s.json", T::KIND)))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, T>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("{} does not exist yet, treating as empty", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Write through a sibling temp file so a crash never leaves half a file.
    fn save(&self, records: &BTreeMap<String, T>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(records).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        debug!("Saved {} {} record(s) to {}", records.len(), T::KIND, self.path.display());
        Ok(())
    }
}

impl<T: Record> RecordStore<T> for JsonStore<T> {
    fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.load()?.into_values().collect())
    }

    fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.load()?.remove(id))
    }

    fn add(&self, record: T) -> Result<(), StoreError> {
        let mut records = self.load()?;
        if records.contains_key(record.id()) {
            return Ok(());
        }
        records.insert(record.id().to_string(), record);
        self.save(&records)
    }

    fn update(&self, record: T) -> Result<(), StoreError> {
        let mut records = self.load()?;
        match records.get_mut(record.id()) {
            Some(slot) => *slot = record,
            None => {
                return Err(StoreError::NotFound {
                    kind: T::KIND,
                    id: record.id().to_string(),
                })
            }
        }
        self.save(&records)
    }

    fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError> {
        let mut records = self.load()?;
        let removed = ids.iter().filter(|id| records.remove(*id).is_some()).count();
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// In-memory store for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct MemoryStore<T> {
    records: std::cell::RefCell<BTreeMap<String, T>>,
    /// When set, every operation fails with this message. Shared so a test
    /// can keep the switch after boxing the store into a [`Catalog`].
    pub fail_with: std::rc::Rc<std::cell::RefCell<Option<String>>>,
    /// When set, only this many more `add` calls succeed.
    pub adds_left: std::rc::Rc<std::cell::Cell<Option<usize>>>,
}

#[cfg(test)]
impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: std::cell::RefCell::new(BTreeMap::new()),
            fail_with: Default::default(),
            adds_left: Default::default(),
        }
    }
}

#[cfg(test)]
impl<T: Record> MemoryStore<T> {
    fn check(&self) -> Result<(), StoreError> {
        match self.fail_with.borrow().as_ref() {
            Some(reason) => Err(StoreError::Io {
                path: PathBuf::from("memory"),
                source: io::Error::new(io::ErrorKind::Other, reason.clone()),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    fn list(&self) -> Result<Vec<T>, StoreError> {
        self.check()?;
        Ok(self.records.borrow().values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        self.check()?;
        Ok(self.records.borrow().get(id).cloned())
    }

    fn add(&self, record: T) -> Result<(), StoreError> {
        self.check()?;
        match self.adds_left.get() {
            Some(0) => {
                return Err(StoreError::Io {
                    path: PathBuf::from("memory"),
                    source: io::Error::new(io::ErrorKind::Other, "store full"),
                })
            }
            Some(n) => self.adds_left.set(Some(n - 1)),
            None => {}
        }
        self.records
            .borrow_mut()
            .entry(record.id().to_string())
            .or_insert(record);
        Ok(())
    }

    fn update(&self, record: T) -> Result<(), StoreError> {
        self.check()?;
        let mut records = self.records.borrow_mut();
        match records.get_mut(record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                kind: T::KIND,
                id: record.id().to_string(),
            }),
        }
    }

    fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError> {
        self.check()?;
        let mut records = self.records.borrow_mut();
        Ok(ids.iter().filter(|id| records.remove(*id).is_some()).count())
    }
}

// ---------------------------------------------------------------------------
// Catalog: the five stores the application works with
// ---------------------------------------------------------------------------

pub struct Catalog {
    pub levels: Box<dyn RecordStore<Level>>,
    pub categories: Box<dyn RecordStore<Category>>,
    pub questions: Box<dyn RecordStore<Question>>,
    pub answers: Box<dyn RecordStore<Answer>>,
    pub players: Box<dyn RecordStore<Player>>,
}

impl Catalog {
    /// JSON-backed catalog rooted at `dir`.
    pub fn open(dir: &Path) -> Self {
        debug!("Opening catalog in {}", dir.display());
        Self {
            levels: Box::new(JsonStore::<Level>::in_dir(dir)),
            categories: Box::new(JsonStore::<Category>::in_dir(dir)),
            questions: Box::new(JsonStore::<Question>::in_dir(dir)),
            answers: Box::new(JsonStore::<Answer>::in_dir(dir)),
            players: Box::new(JsonStore::<Player>::in_dir(dir)),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            levels: Box::<MemoryStore<Level>>::default(),
            categories: Box::<MemoryStore<Category>>::default(),
            questions: Box::<MemoryStore<Question>>::default(),
            answers: Box::<MemoryStore<Answer>>::default(),
            players: Box::<MemoryStore<Player>>::default(),
        }
    }

    /// All levels ordered by difficulty.
    pub fn ladder(&self) -> Result<Vec<Level>, StoreError> {
        let mut levels = self.levels.list()?;
        levels.sort_by_key(|l| l.value);
        Ok(levels)
    }

    pub fn level_by_value(&self, value: u32) -> Result<Option<Level>, StoreError> {
        Ok(self.levels.filter(&|l| l.value == value)?.into_iter().next())
    }

    pub fn categories_by_level(&self, level_id: &str) -> Result<Vec<Category>, StoreError> {
        self.categories.filter(&|c| c.level == level_id)
    }

    pub fn questions_by_category(&self, category_id: &str) -> Result<Vec<Question>, StoreError> {
        self.questions.filter(&|q| q.category == category_id)
    }

    pub fn answers_by_question(&self, question_id: &str) -> Result<Vec<Answer>, StoreError> {
        self.answers.filter(&|a| a.question == question_id)
    }

    pub fn player_by_username(&self, username: &str) -> Result<Option<Player>, StoreError> {
        Ok(self
            .players
            .filter(&|p| p.username == username)?
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Level>::in_dir(dir.path());
        assert!(store.list().unwrap().is_empty());
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_add_get_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let level = Level::new(1, 100);
        JsonStore::<Level>::in_dir(dir.path())
            .add(level.clone())
            .unwrap();

        assert!(dir.path().join("levels.json").exists());
        let reopened = JsonStore::<Level>::in_dir(dir.path());
        assert_eq!(reopened.get(&level.id).unwrap(), Some(level));
    }

    #[test]
    fn test_add_existing_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Level>::in_dir(dir.path());
        let level = Level::new(1, 100);
        store.add(level.clone()).unwrap();

        let mut changed = level.clone();
        changed.prize = 999;
        store.add(changed).unwrap();

        assert_eq!(store.list().unwrap(), vec![level]);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Player>::in_dir(dir.path());
        let err = store.update(Player::new("ada", 1, 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "player", .. }));
    }

    #[test]
    fn test_delete_many_counts_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Level>::in_dir(dir.path());
        let a = Level::new(1, 100);
        let b = Level::new(2, 200);
        store.add(a.clone()).unwrap();
        store.add(b.clone()).unwrap();

        let removed = store
            .delete_many(&[a.id.clone(), "missing".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.list().unwrap(), vec![b]);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("levels.json"), "{ not json").unwrap();
        let err = JsonStore::<Level>::in_dir(dir.path()).list().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = Catalog::in_memory();
        let one = Level::new(1, 100);
        let two = Level::new(2, 200);
        catalog.levels.add(two.clone()).unwrap();
        catalog.levels.add(one.clone()).unwrap();
        let history = Category::new("History", &one.id);
        catalog.categories.add(history.clone()).unwrap();
        catalog
            .categories
            .add(Category::new("Science", &two.id))
            .unwrap();

        assert_eq!(catalog.ladder().unwrap(), vec![one.clone(), two]);
        assert_eq!(catalog.level_by_value(1).unwrap(), Some(one.clone()));
        assert_eq!(catalog.level_by_value(9).unwrap(), None);
        assert_eq!(catalog.categories_by_level(&one.id).unwrap(), vec![history]);
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemoryStore::<Level>::default();
        *store.fail_with.borrow_mut() = Some("disk on fire".into());
        assert!(matches!(store.list(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_memory_store_add_budget() {
        let store = MemoryStore::<Level>::default();
        store.adds_left.set(Some(1));
        store.add(Level::new(1, 100)).unwrap();
        assert!(store.add(Level::new(2, 200)).is_err());
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
