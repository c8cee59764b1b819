pub mod models;
pub mod storage;

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

use crate::errors::AppError;
pub use models::{FavoriteItem, Notice};
use storage::KeyValueStore;

/// Key the list is stored under.
pub const STORAGE_KEY: &str = "my-list";

const NOTICE_CAPACITY: usize = 16;

/// What `load` found in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet.
    Missing,
    /// Stored payload was not a list of favorites; started empty.
    Malformed,
    Loaded(usize),
}

pub type Snapshot = Arc<[FavoriteItem]>;

/// The user's "My List".
///
/// Entries are unique by `id` and kept in insertion order. Every mutation
/// rewrites the whole list to storage before returning, and the in-memory
/// list is only replaced once that write succeeded.
pub struct FavoritesStore {
    backend: Arc<dyn KeyValueStore>,
    items: RwLock<Snapshot>,
    snapshots: watch::Sender<Snapshot>,
    notices: broadcast::Sender<Notice>,
    load_outcome: LoadOutcome,
}

impl FavoritesStore {
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let (items, load_outcome) = Self::read_collection(backend.as_ref())?;

        match load_outcome {
            LoadOutcome::Missing => log::debug!("No saved list under '{}'", STORAGE_KEY),
            LoadOutcome::Malformed => {
                log::warn!("Saved list under '{}' is unreadable, starting empty", STORAGE_KEY)
            }
            LoadOutcome::Loaded(count) => log::info!("Loaded {} saved titles", count),
        }

        let items: Snapshot = items.into();
        let (snapshots, _) = watch::channel(items.clone());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Ok(Self {
            backend,
            items: RwLock::new(items),
            snapshots,
            notices,
            load_outcome,
        })
    }

    fn read_collection(
        backend: &dyn KeyValueStore,
    ) -> Result<(Vec<FavoriteItem>, LoadOutcome), AppError> {
        let Some(raw) = backend.read(STORAGE_KEY)? else {
            return Ok((Vec::new(), LoadOutcome::Missing));
        };

        let parsed: Vec<FavoriteItem> = match serde_json::from_slice(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("Failed to parse saved list: {}", e);
                return Ok((Vec::new(), LoadOutcome::Malformed));
            }
        };

        // A hand-edited file may repeat ids; the first occurrence wins.
        let mut seen = HashSet::new();
        let items: Vec<FavoriteItem> = parsed
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();
        let count = items.len();
        Ok((items, LoadOutcome::Loaded(count)))
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn items(&self) -> Snapshot {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.read().iter().any(|item| item.id == id)
    }

    /// Observers always see the latest list.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn add(&self, item: FavoriteItem) -> Result<Notice, AppError> {
        let mut items = self.items.write();

        if items.iter().any(|existing| existing.id == item.id) {
            log::debug!("Title {} already saved", item.id);
            return Ok(self.notify(Notice::AlreadyPresent));
        }

        let id = item.id;
        let mut updated = items.to_vec();
        updated.push(item);
        self.persist(&updated)?;

        *items = updated.into();
        self.snapshots.send_replace(items.clone());
        log::info!("Saved title {} ({} in list)", id, items.len());
        Ok(self.notify(Notice::Added))
    }

    /// Removing an id that is not saved still rewrites the list and reports success.
    pub fn remove(&self, id: u64) -> Result<Notice, AppError> {
        let mut items = self.items.write();

        let updated: Vec<FavoriteItem> = items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        self.persist(&updated)?;

        *items = updated.into();
        self.snapshots.send_replace(items.clone());
        log::info!("Removed title {} ({} in list)", id, items.len());
        Ok(self.notify(Notice::Removed))
    }

    fn persist(&self, items: &[FavoriteItem]) -> Result<(), AppError> {
        let json = serde_json::to_vec(items)?;
        self.backend.write(STORAGE_KEY, &json)
    }

    fn notify(&self, notice: Notice) -> Notice {
        // No listeners is fine.
        let _ = self.notices.send(notice);
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::storage::{JsonFileStore, MemoryStore};
    use super::*;
    use crate::tmdb::MediaType;

    fn empty_store() -> (Arc<MemoryStore>, FavoritesStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = FavoritesStore::load(backend.clone()).unwrap();
        (backend, store)
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, AppError> {
            Ok(Some(br#"[{"id": 1, "title": "A"}]"#.to_vec()))
        }

        fn write(&self, _key: &str, _value: &[u8]) -> Result<(), AppError> {
            Err(AppError::Storage("read-only".to_string()))
        }
    }

    #[test]
    fn test_add_new_item_grows_list() {
        let (backend, store) = empty_store();

        let notice = store.add(FavoriteItem::new(42, "Arrival")).unwrap();

        assert_eq!(notice, Notice::Added);
        assert_eq!(store.len(), 1);
        assert!(store.contains(42));
        let saved = String::from_utf8(backend.get(STORAGE_KEY).unwrap()).unwrap();
        assert!(saved.contains("Arrival"));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let (backend, store) = empty_store();
        store.add(FavoriteItem::new(1, "A")).unwrap();
        let written = backend.get(STORAGE_KEY);

        let notice = store.add(FavoriteItem::new(1, "A again")).unwrap();

        assert_eq!(notice, Notice::AlreadyPresent);
        assert!(!notice.is_success());
        assert_eq!(store.items().to_vec(), vec![FavoriteItem::new(1, "A")]);
        assert_eq!(backend.get(STORAGE_KEY), written);
    }

    #[test]
    fn test_remove_present_and_absent() {
        let (_, store) = empty_store();
        store.add(FavoriteItem::new(1, "A")).unwrap();
        store.add(FavoriteItem::new(2, "B")).unwrap();

        assert_eq!(store.remove(1).unwrap(), Notice::Removed);
        assert_eq!(store.len(), 1);
        assert!(!store.contains(1));

        assert_eq!(store.remove(99).unwrap(), Notice::Removed);
        assert_eq!(store.items().to_vec(), vec![FavoriteItem::new(2, "B")]);
    }

    #[test]
    fn test_add_duplicate_remove_scenario() {
        let (_, store) = empty_store();

        store.add(FavoriteItem::new(1, "A")).unwrap();
        assert_eq!(store.items().to_vec(), vec![FavoriteItem::new(1, "A")]);

        store.add(FavoriteItem::new(1, "A")).unwrap();
        assert_eq!(store.items().to_vec(), vec![FavoriteItem::new(1, "A")]);

        store.remove(1).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reload_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(JsonFileStore::new(dir.path()));

        let store = FavoritesStore::load(backend.clone()).unwrap();
        store
            .add(FavoriteItem::new(3, "Dark").with_media(MediaType::Tv).with_poster("/d.jpg"))
            .unwrap();
        store.add(FavoriteItem::new(1, "Alien")).unwrap();
        store.add(FavoriteItem::new(2, "Heat")).unwrap();
        let before = store.items();
        drop(store);

        let reloaded = FavoritesStore::load(backend).unwrap();
        assert_eq!(reloaded.load_outcome(), LoadOutcome::Loaded(3));
        assert_eq!(reloaded.items(), before);
        assert_eq!(reloaded.items()[0].media(), MediaType::Tv);
        assert_eq!(reloaded.items()[1].media(), MediaType::Movie);
    }

    #[test]
    fn test_missing_and_malformed_payloads_load_empty() {
        let (_, missing) = empty_store();
        assert_eq!(missing.load_outcome(), LoadOutcome::Missing);
        assert!(missing.is_empty());

        for payload in ["not json", r#"{"id": 1}"#, r#"[{"title": "no id"}]"#] {
            let backend = Arc::new(MemoryStore::with_value(STORAGE_KEY, payload));
            let store = FavoritesStore::load(backend).unwrap();
            assert_eq!(store.load_outcome(), LoadOutcome::Malformed, "{}", payload);
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_list_file_that_is_not_text_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(JsonFileStore::new(dir.path()));
        std::fs::write(backend.path_for(STORAGE_KEY), [0xff, 0xfe, 0x5b, 0x5d]).unwrap();

        let store = FavoritesStore::load(backend.clone()).unwrap();
        assert_eq!(store.load_outcome(), LoadOutcome::Malformed);
        assert!(store.is_empty());

        // The next change replaces the unreadable file with a valid list.
        store.add(FavoriteItem::new(7, "Heat")).unwrap();
        let reloaded = FavoritesStore::load(backend).unwrap();
        assert_eq!(reloaded.load_outcome(), LoadOutcome::Loaded(1));
    }

    #[test]
    fn test_load_accepts_name_and_drops_repeated_ids() {
        let payload = r#"[
            {"id": 5, "name": "Severance", "poster_path": "/s.jpg", "media_type": "tv"},
            {"id": 5, "title": "Duplicate"},
            {"id": 6, "title": "Up"}
        ]"#;
        let backend = Arc::new(MemoryStore::with_value(STORAGE_KEY, payload));
        let store = FavoritesStore::load(backend).unwrap();

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Severance");
        assert_eq!(items[0].media(), MediaType::Tv);
        assert_eq!(items[1].id, 6);
    }

    #[test]
    fn test_failed_write_keeps_memory_unchanged() {
        let store = FavoritesStore::load(Arc::new(ReadOnlyStore)).unwrap();

        assert!(matches!(
            store.add(FavoriteItem::new(2, "B")),
            Err(AppError::Storage(_))
        ));
        assert!(store.remove(1).is_err());
        assert_eq!(store.items().to_vec(), vec![FavoriteItem::new(1, "A")]);
    }

    #[test]
    fn test_observers_see_updates_and_notices() {
        let (_, store) = empty_store();
        let mut snapshots = store.subscribe();
        let mut notices = store.notices();

        store.add(FavoriteItem::new(1, "A")).unwrap();
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().len(), 1);

        store.add(FavoriteItem::new(1, "A")).unwrap();
        assert!(!snapshots.has_changed().unwrap());

        store.remove(1).unwrap();
        assert!(snapshots.borrow_and_update().is_empty());

        assert_eq!(notices.try_recv().unwrap(), Notice::Added);
        assert_eq!(notices.try_recv().unwrap(), Notice::AlreadyPresent);
        assert_eq!(notices.try_recv().unwrap(), Notice::Removed);
    }

    #[test]
    fn test_favorite_from_catalog_item_uses_name() {
        let item: crate::tmdb::CatalogItem = serde_json::from_str(
            r#"{"id": 9, "name": "Dark", "poster_path": "/d.jpg", "media_type": "tv"}"#,
        )
        .unwrap();
        let favorite = FavoriteItem::from(&item);
        assert_eq!(favorite.title, "Dark");
        assert_eq!(favorite.media(), MediaType::Tv);
        assert_eq!(favorite.poster_path.as_deref(), Some("/d.jpg"));
    }
}
