use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::models::{CreateReservationData, Reservation, ReservationStats, ReservationStatus};
use crate::services::qr;
use crate::services::whatsapp::ReservationNotifier;
use crate::storage::KeyValueStore;

/// Durable entry holding the serialized reservation list.
pub const STORAGE_KEY: &str = "reservations";

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 8;
const CODE_ATTEMPTS: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum ReservationError {
    #[error("No se pudo generar el código QR: {0}")]
    Qr(#[from] qr::QrError),

    #[error("No unused reservation code found after {0} attempts")]
    CodeSpaceExhausted(usize),
}

/// A freshly generated shareable token: `RES-` plus 8 characters drawn
/// uniformly from `A-Z0-9`. Uniqueness against existing reservations is the
/// store's job, not this function's.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("RES-{}", suffix)
}

/// Owns the reservation lifecycle: creation, persistence, cancellation,
/// lookup and derived statistics.
///
/// The collection keeps insertion order (creation order) and is mirrored to
/// the injected store on every mutation. Persistence failures are recorded
/// and logged, never propagated; the in-memory state is the best-effort
/// source of truth.
pub struct ReservationStore {
    reservations: Vec<Reservation>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn ReservationNotifier>,
    busy: bool,
    last_error: Option<String>,
}

impl ReservationStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn ReservationNotifier>) -> Self {
        Self {
            reservations: Vec::new(),
            storage,
            notifier,
            busy: false,
            last_error: None,
        }
    }

    /// Replaces the in-memory collection with the stored one. An absent
    /// entry or malformed payload leaves the collection unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) {
        match self.storage.get(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Reservation>>(&raw) {
                Ok(reservations) => {
                    tracing::debug!(count = reservations.len(), "Loaded stored reservations");
                    self.reservations = reservations;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Stored reservations are malformed, keeping in-memory state");
                    self.last_error = Some(format!("Error cargando reservas: {}", e));
                }
            },
            Ok(None) => {
                tracing::debug!("No stored reservations yet");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored reservations");
                self.last_error = Some(format!("Error cargando reservas: {}", e));
            }
        }
    }

    /// Writes the full collection to the durable entry. Failure does not
    /// roll back the mutation that triggered the write.
    async fn save(&mut self) {
        let payload = match serde_json::to_string(&self.reservations) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize reservations");
                self.last_error = Some(format!("Error guardando reservas: {}", e));
                return;
            }
        };

        if let Err(e) = self.storage.put(STORAGE_KEY, &payload).await {
            tracing::error!(error = %e, "Failed to persist reservations");
            self.last_error = Some(format!("Error guardando reservas: {}", e));
        }
    }

    /// Creates, persists and (optionally) shares a reservation.
    ///
    /// The QR step is all-or-nothing: if encoding fails nothing is stored.
    /// When `auto_share` is set, the notification task is spawned strictly
    /// after the persistence write has completed.
    #[tracing::instrument(skip(self, data), fields(event_id = %data.event_id))]
    pub async fn create(
        &mut self,
        data: CreateReservationData,
        auto_share: bool,
    ) -> Result<Reservation, ReservationError> {
        self.busy = true;
        self.last_error = None;

        let result = self.create_inner(data, auto_share).await;

        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }
        self.busy = false;
        result
    }

    async fn create_inner(
        &mut self,
        data: CreateReservationData,
        auto_share: bool,
    ) -> Result<Reservation, ReservationError> {
        // 1. Generate a code no stored reservation is using.
        let code = self.unique_code()?;

        // 2. Encode it as a QR image. Failing here aborts the whole call.
        let qr_code = qr::generate_data_url(&code)?;

        // 3. Assemble the reservation with its event snapshot.
        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            code,
            full_name: data.full_name,
            email: data.email,
            whatsapp_phone: data.whatsapp_phone,
            event_id: data.event_id,
            event_name: data.event_name,
            date: data.date,
            time: data.time,
            status: ReservationStatus::Confirmed,
            notes: data.notes,
            qr_code: Some(qr_code),
            created_at: Utc::now(),
        };

        // 4. Append and persist before anything external sees it.
        self.reservations.push(reservation.clone());
        self.save().await;

        tracing::info!(
            code = %reservation.code,
            event = %reservation.event_name,
            "Reservation created"
        );

        // 5. Hand off to the notifier without blocking the caller.
        if auto_share {
            let notifier = Arc::clone(&self.notifier);
            let shared = reservation.clone();
            tokio::spawn(async move {
                notifier.notify(&shared).await;
            });
        }

        Ok(reservation)
    }

    fn unique_code(&self) -> Result<String, ReservationError> {
        for _ in 0..CODE_ATTEMPTS {
            let code = generate_code();
            if !self.reservations.iter().any(|r| r.code == code) {
                return Ok(code);
            }
        }
        Err(ReservationError::CodeSpaceExhausted(CODE_ATTEMPTS))
    }

    /// Exact, case-sensitive code lookup.
    pub fn find_by_code(&self, code: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.code == code)
    }

    /// All reservations for an email, in creation order.
    pub fn find_by_email(&self, email: &str) -> Vec<&Reservation> {
        self.reservations.iter().filter(|r| r.email == email).collect()
    }

    /// Cancels by id and persists. Returns whether a reservation was found;
    /// repeating the call keeps the status cancelled and returns true again.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&mut self, id: &str) -> bool {
        let Some(reservation) = self.reservations.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(id = %id, "Cancel requested for unknown reservation");
            return false;
        };

        reservation.status = ReservationStatus::Cancelled;
        let code = reservation.code.clone();
        self.save().await;

        tracing::info!(code = %code, "Reservation cancelled");
        true
    }

    /// Counts over the current collection, recomputed on every call.
    pub fn stats(&self) -> ReservationStats {
        let mut stats = ReservationStats {
            total: self.reservations.len(),
            confirmed: 0,
            pending: 0,
            cancelled: 0,
        };

        for reservation in &self.reservations {
            match reservation.status {
                ReservationStatus::Confirmed => stats.confirmed += 1,
                ReservationStatus::Pending => stats.pending += 1,
                ReservationStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::mpsc;

    struct NullNotifier;

    #[async_trait]
    impl ReservationNotifier for NullNotifier {
        async fn notify(&self, _reservation: &Reservation) {}
    }

    struct ChannelNotifier {
        tx: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl ReservationNotifier for ChannelNotifier {
        async fn notify(&self, reservation: &Reservation) {
            let _ = self.tx.send(reservation.code.clone());
        }
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )))
        }
    }

    fn ana_data() -> CreateReservationData {
        CreateReservationData {
            full_name: "Ana García".to_string(),
            email: "ana@example.com".to_string(),
            whatsapp_phone: "+52 55 1234 5678".to_string(),
            event_id: "7".to_string(),
            event_name: "Concierto de Jazz en Vivo".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 16).unwrap(),
            time: "21:00".to_string(),
            notes: None,
        }
    }

    fn store_over(storage: Arc<dyn KeyValueStore>) -> ReservationStore {
        ReservationStore::new(storage, Arc::new(NullNotifier))
    }

    fn assert_code_format(code: &str) {
        let suffix = code.strip_prefix("RES-").expect("RES- prefix");
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_codes_match_format() {
        for _ in 0..100 {
            assert_code_format(&generate_code());
        }
    }

    #[tokio::test]
    async fn test_create_confirms_and_is_findable_by_email() {
        let mut store = store_over(Arc::new(MemoryStore::new()));

        let reservation = store.create(ana_data(), false).await.unwrap();

        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_code_format(&reservation.code);
        assert!(!reservation.qr_code.as_deref().unwrap_or_default().is_empty());

        let by_email = store.find_by_email("ana@example.com");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id, reservation.id);
        assert!(store.find_by_email("nadie@example.com").is_empty());
    }

    #[tokio::test]
    async fn test_create_roundtrips_through_persistence() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let mut store = store_over(Arc::clone(&storage));
        let created = store.create(ana_data(), false).await.unwrap();

        // A fresh store over the same backing entry sees the reservation.
        let mut reloaded = store_over(storage);
        reloaded.load().await;

        let found = reloaded.find_by_code(&created.code).unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.full_name, created.full_name);
        assert_eq!(found.status, created.status);
        assert_eq!(found.qr_code, created.qr_code);
        assert_eq!(found.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_find_by_code_is_case_sensitive() {
        let mut store = store_over(Arc::new(MemoryStore::new()));
        let created = store.create(ana_data(), false).await.unwrap();

        assert!(store.find_by_code(&created.code).is_some());
        assert!(store.find_by_code(&created.code.to_lowercase()).is_none());
        assert!(store.find_by_code("RES-NOPE0000").is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique_across_creates() {
        let mut store = store_over(Arc::new(MemoryStore::new()));

        for _ in 0..5 {
            store.create(ana_data(), false).await.unwrap();
        }

        let mut ids: Vec<_> = store.reservations().iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_is_a_noop() {
        let mut store = store_over(Arc::new(MemoryStore::new()));
        store.create(ana_data(), false).await.unwrap();

        assert!(!store.cancel("missing-id").await);
        assert_eq!(store.stats().confirmed, 1);
        assert_eq!(store.stats().cancelled, 0);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let mut store = store_over(Arc::new(MemoryStore::new()));
        let reservation = store.create(ana_data(), false).await.unwrap();

        assert!(store.cancel(&reservation.id).await);
        assert_eq!(
            store.find_by_code(&reservation.code).unwrap().status,
            ReservationStatus::Cancelled
        );

        // Second cancellation reports found again and changes nothing.
        assert!(store.cancel(&reservation.id).await);
        assert_eq!(store.stats().cancelled, 1);
    }

    #[tokio::test]
    async fn test_stats_totals_add_up() {
        let mut store = store_over(Arc::new(MemoryStore::new()));

        let first = store.create(ana_data(), false).await.unwrap();
        store.create(ana_data(), false).await.unwrap();
        store.create(ana_data(), false).await.unwrap();
        store.cancel(&first.id).await;

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.confirmed, 2);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.total, stats.confirmed + stats.pending + stats.cancelled);
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_reservation_in_memory() {
        let mut store = store_over(Arc::new(FailingStore));

        let reservation = store.create(ana_data(), false).await.unwrap();

        assert!(store.find_by_code(&reservation.code).is_some());
        assert!(store.last_error().unwrap().contains("Error guardando reservas"));
    }

    #[tokio::test]
    async fn test_load_ignores_malformed_payload() {
        let storage = Arc::new(MemoryStore::new());
        storage.put(STORAGE_KEY, "not json at all").await.unwrap();

        let mut store = store_over(storage);
        store.create(ana_data(), false).await.unwrap();
        let before = store.reservations().len();

        store.load().await;

        assert_eq!(store.reservations().len(), before);
        assert!(store.last_error().unwrap().contains("Error cargando reservas"));
    }

    #[tokio::test]
    async fn test_auto_share_notifies_after_persistence() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store =
            ReservationStore::new(Arc::clone(&storage), Arc::new(ChannelNotifier { tx }));

        let reservation = store.create(ana_data(), true).await.unwrap();

        let notified_code = rx.recv().await.unwrap();
        assert_eq!(notified_code, reservation.code);

        // The reservation was already durable when the notification fired.
        let stored = storage.get(STORAGE_KEY).await.unwrap().unwrap();
        assert!(stored.contains(&reservation.code));
    }

    #[tokio::test]
    async fn test_busy_flag_clears_on_success() {
        let mut store = store_over(Arc::new(MemoryStore::new()));
        store.create(ana_data(), false).await.unwrap();
        assert!(!store.is_busy());
        assert!(store.last_error().is_none());
    }
}
