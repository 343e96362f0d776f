//! In-process record store.
//!
//! [`MemoryStore`] keeps rows in a `BTreeMap` behind a
//! [`tokio::sync::RwLock`] and hands out keys from a counter starting at 1,
//! like a `BIGSERIAL` column.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::domain::page::clamp_limit;
use crate::domain::{Page, PageCursor, Record, RecordId};
use crate::error::AppError;

/// Record store held entirely in memory.
#[derive(Debug)]
pub struct MemoryStore<R: Record> {
    rows: RwLock<BTreeMap<RecordId, R>>,
    next_id: AtomicI64,
}

impl<R: Record> MemoryStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns `true` if the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn list(&self, limit: u32, cursor: PageCursor) -> Result<Page<R>, AppError> {
        let limit = clamp_limit(limit);
        let rows = self.rows.read().await;
        let mut sorted: Vec<&R> = rows.values().collect();
        sorted.sort_by(|a, b| a.listing_order(b));

        let skip = usize::try_from(cursor.offset()).unwrap_or(usize::MAX);
        let items = sorted
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(Page::from_rows(items, cursor, limit))
    }

    async fn read(&self, id: RecordId) -> Result<Option<R>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, fields: R::Fields) -> Result<R, AppError> {
        let id = RecordId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = R::from_fields(id, fields);
        self.rows.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: RecordId, fields: R::Fields) -> Result<R, AppError> {
        let mut rows = self.rows.write().await;
        let record = rows
            .get_mut(&id)
            .ok_or(AppError::RecordNotFound { kind: R::KIND, id })?;
        record.apply(fields);
        Ok(record.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Customer, CustomerFields, Hotel, HotelFields};

    fn hotel_named(name: &str) -> HotelFields {
        HotelFields {
            name: Some(name.to_string()),
            ..HotelFields::default()
        }
    }

    async fn create(store: &MemoryStore<Hotel>, fields: HotelFields) -> Hotel {
        let Ok(hotel) = store.create(fields).await else {
            panic!("create failed");
        };
        hotel
    }

    #[tokio::test]
    async fn create_then_read_returns_input_with_id() {
        let store = MemoryStore::<Hotel>::new();
        let fields = HotelFields {
            name: Some("Inn".to_string()),
            city: Some("Metropolis".to_string()),
            ..HotelFields::default()
        };
        let created = create(&store, fields).await;
        assert_eq!(created.id, RecordId::new(1));

        let Ok(Some(read)) = store.read(created.id).await else {
            panic!("record missing");
        };
        assert_eq!(read.name.as_deref(), Some("Inn"));
        assert_eq!(read.city.as_deref(), Some("Metropolis"));
        assert_eq!(read.state, None);
        assert_eq!(read.image_url, None);
    }

    #[tokio::test]
    async fn read_missing_is_none() {
        let store = MemoryStore::<Hotel>::new();
        assert!(matches!(store.read(RecordId::new(5)).await, Ok(None)));
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryStore::<Hotel>::new();
        let first = create(&store, hotel_named("A")).await;
        let _ = store.delete(first.id).await;
        let second = create(&store, hotel_named("B")).await;
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn delete_then_read_is_none() {
        let store = MemoryStore::<Hotel>::new();
        let hotel = create(&store, hotel_named("Inn")).await;
        assert!(store.delete(hotel.id).await.is_ok());
        assert!(matches!(store.read(hotel.id).await, Ok(None)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_missing_is_noop() {
        let store = MemoryStore::<Hotel>::new();
        let _ = create(&store, hotel_named("Inn")).await;
        assert!(store.delete(RecordId::new(99)).await.is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = MemoryStore::<Hotel>::new();
        let result = store.update(RecordId::new(3), hotel_named("X")).await;
        assert!(matches!(
            result,
            Err(AppError::RecordNotFound { kind: "hotel", .. })
        ));
    }

    #[tokio::test]
    async fn update_is_idempotent() {
        let store = MemoryStore::<Hotel>::new();
        let hotel = create(&store, hotel_named("Inn")).await;
        let patch = HotelFields {
            city: Some("Gotham".to_string()),
            ..HotelFields::default()
        };
        let Ok(once) = store.update(hotel.id, patch.clone()).await else {
            panic!("update failed");
        };
        let Ok(twice) = store.update(hotel.id, patch).await else {
            panic!("update failed");
        };
        assert_eq!(once, twice);
        assert_eq!(twice.name.as_deref(), Some("Inn"));
    }

    #[tokio::test]
    async fn short_list_has_no_next_cursor() {
        let store = MemoryStore::<Hotel>::new();
        for name in ["C", "A", "B"] {
            let _ = create(&store, hotel_named(name)).await;
        }
        let Ok(page) = store.list(10, PageCursor::START).await else {
            panic!("list failed");
        };
        let names: Vec<_> = page.items.iter().filter_map(|h| h.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn mixed_case_names_list_in_byte_order() {
        let store = MemoryStore::<Hotel>::new();
        for name in ["apple", "Banana", "cherry"] {
            let _ = create(&store, hotel_named(name)).await;
        }
        let Ok(page) = store.list(10, PageCursor::START).await else {
            panic!("list failed");
        };
        let names: Vec<_> = page.items.iter().filter_map(|h| h.name.as_deref()).collect();
        assert_eq!(names, vec!["Banana", "apple", "cherry"]);
    }

    #[tokio::test]
    async fn full_page_links_to_next() {
        let store = MemoryStore::<Hotel>::new();
        for name in ["E", "D", "C", "B", "A"] {
            let _ = create(&store, hotel_named(name)).await;
        }
        let Ok(first) = store.list(2, PageCursor::START).await else {
            panic!("list failed");
        };
        assert_eq!(first.items.len(), 2);
        let Some(next) = first.next_cursor else {
            panic!("expected next cursor");
        };
        assert_eq!(next.offset(), 2);

        let Ok(last) = store.list(2, PageCursor::at(4)).await else {
            panic!("list failed");
        };
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items.first().and_then(|h| h.name.as_deref()), Some("E"));
        assert_eq!(last.next_cursor, None);
    }

    #[tokio::test]
    async fn customers_list_by_last_name() {
        let store = MemoryStore::<Customer>::new();
        for (fname, lname) in [("Ada", "Lovelace"), ("Alan", "Turing"), ("Grace", "Hopper")] {
            let _ = store
                .create(CustomerFields {
                    fname: Some(fname.to_string()),
                    lname: Some(lname.to_string()),
                    ..CustomerFields::default()
                })
                .await;
        }
        let Ok(page) = store.list(10, PageCursor::START).await else {
            panic!("list failed");
        };
        let last_names: Vec<_> = page.items.iter().filter_map(|c| c.lname.as_deref()).collect();
        assert_eq!(last_names, vec!["Hopper", "Lovelace", "Turing"]);
    }
}
