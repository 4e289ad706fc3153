use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A catalog event. Seeded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Human-readable venue label, e.g. "Centro, Fresnillo".
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    /// Local start time as shown to attendees, e.g. "21:00".
    pub time: String,
    pub category: String,
    pub capacity: u32,
    pub price: f64,
    /// Distance from the user's position in kilometers. Computed on demand,
    /// never persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}
