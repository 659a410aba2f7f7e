use std::sync::Arc;

use bookshelf_kv::KVStore;
use uuid::Uuid;

use super::{BookStore, StoreError};
use crate::model::Book;

const PREFIX: &str = "book/";

/// Books stored as JSON values under `book/<id>` keys.
pub struct KvBookStore {
    kv: Arc<dyn KVStore>,
}

impl KvBookStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn key(id: &Uuid) -> String {
        format!("{}{}", PREFIX, id)
    }

    fn encode(book: &Book) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(book).map_err(StoreError::storage)
    }
}

impl BookStore for KvBookStore {
    fn get_books(&self) -> Result<Vec<Book>, StoreError> {
        let mut books = self
            .kv
            .scan(PREFIX)
            .map_err(StoreError::storage)?
            .into_iter()
            .map(|(_, data)| serde_json::from_slice::<Book>(&data).map_err(StoreError::storage))
            .collect::<Result<Vec<_>, _>>()?;
        // Keys sort by id; callers expect creation order.
        books.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    fn get_book(&self, id: &Uuid) -> Result<Book, StoreError> {
        let data = self
            .kv
            .get(&Self::key(id))
            .map_err(StoreError::storage)?
            .ok_or(StoreError::NotFound(*id))?;
        serde_json::from_slice(&data).map_err(StoreError::storage)
    }

    fn create_book(&self, book: &Book) -> Result<(), StoreError> {
        let data = Self::encode(book)?;
        if self
            .kv
            .insert_new(&Self::key(&book.id), &data)
            .map_err(StoreError::storage)?
        {
            Ok(())
        } else {
            Err(StoreError::Storage(format!("book {} already exists", book.id)))
        }
    }

    fn update_book(&self, book: &Book) -> Result<(), StoreError> {
        let data = Self::encode(book)?;
        if self
            .kv
            .replace(&Self::key(&book.id), &data)
            .map_err(StoreError::storage)?
        {
            Ok(())
        } else {
            Err(StoreError::NotFound(book.id))
        }
    }

    fn delete_book(&self, id: &Uuid) -> Result<(), StoreError> {
        if self.kv.delete(&Self::key(id)).map_err(StoreError::storage)? {
            Ok(())
        } else {
            Err(StoreError::NotFound(*id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookAttrs, CreateBook, UpdateBook};
    use bookshelf_kv::RedbStore;
    use chrono::{Duration, Utc};

    fn test_store() -> KvBookStore {
        KvBookStore::new(Arc::new(RedbStore::open_in_memory().unwrap()))
    }

    fn sample(title: &str, at: chrono::DateTime<Utc>) -> Book {
        Book::new(
            CreateBook {
                title: title.into(),
                author: "Anon".into(),
                attrs: BookAttrs::default(),
            },
            at,
        )
    }

    #[test]
    fn test_book_crud() {
        let store = test_store();
        let book = sample("Solaris", Utc::now());
        store.create_book(&book).unwrap();
        assert_eq!(store.get_book(&book.id).unwrap(), book);

        let updated = book.apply(
            UpdateBook {
                id: book.id,
                title: "Solaris (2nd ed.)".into(),
                author: "Stanisław Lem".into(),
                attrs: BookAttrs::default(),
            },
            Utc::now(),
        );
        store.update_book(&updated).unwrap();
        assert_eq!(store.get_book(&book.id).unwrap().title, "Solaris (2nd ed.)");

        store.delete_book(&book.id).unwrap();
        assert!(matches!(store.delete_book(&book.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_does_not_resurrect() {
        let store = test_store();
        let book = sample("Gone", Utc::now());
        assert!(matches!(store.update_book(&book), Err(StoreError::NotFound(_))));
        assert!(store.get_books().unwrap().is_empty());
    }

    #[test]
    fn test_update_racing_delete_stays_deleted() {
        let store = Arc::new(test_store());
        let book = sample("Contested", Utc::now());
        store.create_book(&book).unwrap();

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                let mut edit = book.clone();
                edit.title = format!("edit {}", i);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        match store.update_book(&edit) {
                            Ok(()) | Err(StoreError::NotFound(_)) => {}
                            Err(e) => panic!("unexpected error: {}", e),
                        }
                    }
                })
            })
            .collect();
        store.delete_book(&book.id).unwrap();
        for w in writers {
            w.join().unwrap();
        }

        assert!(matches!(store.get_book(&book.id), Err(StoreError::NotFound(_))));
        assert!(store.get_books().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_duplicate_id() {
        let store = test_store();
        let book = sample("Once", Utc::now());
        store.create_book(&book).unwrap();
        let mut twin = book.clone();
        twin.title = "Twice".into();
        assert!(matches!(store.create_book(&twin), Err(StoreError::Storage(_))));
        assert_eq!(store.get_book(&book.id).unwrap().title, "Once");
    }

    #[test]
    fn test_list_in_creation_order() {
        let store = test_store();
        let now = Utc::now();
        let books: Vec<Book> = (0..5)
            .map(|i| sample(&format!("B{}", i), now + Duration::seconds(i)))
            .collect();
        for b in books.iter().rev() {
            store.create_book(b).unwrap();
        }
        let listed = store.get_books().unwrap();
        assert_eq!(listed, books);
    }

    #[test]
    fn test_file_backed() {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(RedbStore::open(&dir.path().join("data.redb")).unwrap());
        let store = KvBookStore::new(kv);
        let book = sample("Persisted", Utc::now());
        store.create_book(&book).unwrap();
        assert_eq!(store.get_books().unwrap().len(), 1);
    }
}
