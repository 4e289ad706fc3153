use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a reservation.
///
/// Creation always produces `Confirmed`. `Pending` is kept for a future
/// deferred-confirmation flow; nothing produces it today. Cancellation is
/// one-directional: once `Cancelled`, a reservation stays cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A stored reservation. Only `status` is ever mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    /// Human-shareable token, `RES-` plus 8 uppercase alphanumerics.
    pub code: String,
    pub full_name: String,
    pub email: String,
    pub whatsapp_phone: String,
    /// Not validated against the catalog; the snapshot fields below are what
    /// survive later event edits.
    pub event_id: String,
    pub event_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: ReservationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// PNG data URL of the QR-encoded reservation code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new reservation. Everything else (id, code,
/// status, QR image, timestamp) is assigned by the store.
#[derive(Debug, Clone)]
pub struct CreateReservationData {
    pub full_name: String,
    pub email: String,
    pub whatsapp_phone: String,
    pub event_id: String,
    pub event_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
}

/// Aggregate counts over the current collection, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReservationStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
}
