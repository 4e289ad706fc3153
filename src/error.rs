use thiserror::Error;

use crate::services::location::LocationError;
use crate::services::qr::QrError;
use crate::services::reservations::ReservationError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Reservation error: {0}")]
    Reservation(#[from] ReservationError),

    #[error("QR generation error: {0}")]
    Qr(#[from] QrError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
