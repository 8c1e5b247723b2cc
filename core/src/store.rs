//! Record store boundary used by the caller around a sync.

use std::collections::HashMap;

use tracing::debug;

use crate::client::SyncClient;
use crate::error::SyncError;
use crate::record::ReservationRecord;
use crate::transport::Transport;

/// Source of records to sync and sink for their updates.
pub trait RecordStore {
    fn get_record(&self, id: &str) -> Result<ReservationRecord, SyncError>;
    fn save_record(&mut self, record: ReservationRecord) -> Result<(), SyncError>;
}

/// In-memory [`RecordStore`] keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, ReservationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ReservationRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get_record(&self, id: &str) -> Result<ReservationRecord, SyncError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::RecordNotFound { id: id.to_string() })
    }

    fn save_record(&mut self, record: ReservationRecord) -> Result<(), SyncError> {
        self.insert(record);
        Ok(())
    }
}

impl FromIterator<ReservationRecord> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = ReservationRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

/// Load record `id`, sync it, and save the result. The store is written only
/// when the sync succeeds.
pub fn sync_record<S, T>(
    store: &mut S,
    client: &SyncClient,
    transport: &T,
    id: &str,
) -> Result<ReservationRecord, SyncError>
where
    S: RecordStore + ?Sized,
    T: Transport + ?Sized,
{
    let record = store.get_record(id)?;
    let updated = client.sync(transport, &record)?;
    store.save_record(updated.clone())?;
    debug!(record_id = id, "saved synced reservation");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpResponse};
    use chrono::NaiveDate;

    struct Fixed(u16, &'static str);

    impl Transport for Fixed {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, SyncError> {
            Ok(HttpResponse::new(self.0, self.1))
        }
    }

    fn store() -> MemoryStore {
        [ReservationRecord {
            id: "r1".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..ReservationRecord::default()
        }]
        .into_iter()
        .collect()
    }

    fn client() -> SyncClient {
        SyncClient::new("http://localhost:9090/res/upsert")
    }

    #[test]
    fn insert_fills_empty_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.insert(ReservationRecord {
            id: "r9".to_string(),
            ..ReservationRecord::default()
        });
        assert!(!store.is_empty());
        assert_eq!(store.get_record("r9").unwrap().id, "r9");
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let err = store().get_record("nope").unwrap_err();
        assert!(matches!(err, SyncError::RecordNotFound { ref id } if id == "nope"));
    }

    #[test]
    fn sync_record_saves_on_success() {
        let mut store = store();
        let transport = Fixed(200, r#"{"Sihot_Hotel_Id":"2","Sihot_Res_Id":"900"}"#);
        sync_record(&mut store, &client(), &transport, "r1").unwrap();
        let saved = store.get_record("r1").unwrap();
        assert_eq!(saved.resort.as_deref(), Some("2"));
        assert_eq!(saved.sihot_res_id.as_deref(), Some("900"));
    }

    #[test]
    fn sync_record_leaves_store_untouched_on_error() {
        let mut store = store();
        let before = store.get_record("r1").unwrap();
        let transport = Fixed(400, r#"{"Error":"E1","Message":"bad date"}"#);
        let err = sync_record(&mut store, &client(), &transport, "r1").unwrap_err();
        assert!(matches!(err, SyncError::RemoteRejected { .. }));
        assert_eq!(store.get_record("r1").unwrap(), before);
        assert_eq!(store.len(), 1);
    }
}
