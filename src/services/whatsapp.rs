use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use url::form_urlencoded;

use crate::models::Reservation;

const WEEKDAYS_ES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long-form Spanish date, e.g. "martes, 15 de julio de 2025".
pub fn format_long_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_ES[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS_ES[date.month0() as usize];
    format!("{}, {} de {} de {}", weekday, date.day(), month, date.year())
}

/// Builds the confirmation message sent alongside the reservation.
///
/// The wording and field order are fixed; the optional notes line only
/// appears when the reservation carries notes.
pub fn confirmation_message(reservation: &Reservation) -> String {
    let notes_line = reservation
        .notes
        .as_deref()
        .map(|notes| format!("📝 *Notas:* {}\n\n", notes))
        .unwrap_or_default();

    format!(
        "¡Hola {fullname}! 👋\n\n\
         ✅ *Tu reserva ha sido confirmada*\n\n\
         🎫 *Código de Reserva:* {code}\n\
         📅 *Evento:* {event}\n\
         📅 *Fecha:* {date}\n\
         ⏰ *Hora:* {time}\n\
         👤 *Nombre:* {fullname}\n\
         📧 *Email:* {email}\n\n\
         📱 *Importante:* Presenta este código QR en el evento.\n\n\
         {notes}\
         ¡Te esperamos! 🎉\n\n\
         _Sistema de Reservas - {year}_",
        fullname = reservation.full_name,
        code = reservation.code,
        event = reservation.event_name,
        date = format_long_date(reservation.date),
        time = reservation.time,
        email = reservation.email,
        notes = notes_line,
        year = Utc::now().year(),
    )
}

/// Builds the `https://wa.me/<digits>?text=<encoded>` deep link for a
/// reservation. Everything but digits is stripped from the phone number.
pub fn share_link(reservation: &Reservation) -> String {
    let phone: String = reservation
        .whatsapp_phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let message = confirmation_message(reservation);
    let encoded: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();

    format!("https://wa.me/{}?text={}", phone, encoded)
}

/// External notification capability. Invoked by the store's auto-share task
/// after the reservation has been persisted.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn notify(&self, reservation: &Reservation);
}

/// Default notifier: builds the WhatsApp deep link and surfaces it in the
/// log. Actually opening the link is the caller's side effect.
pub struct WhatsAppNotifier;

#[async_trait]
impl ReservationNotifier for WhatsAppNotifier {
    async fn notify(&self, reservation: &Reservation) {
        let link = share_link(reservation);
        tracing::info!(
            code = %reservation.code,
            link = %link,
            "Reservation ready to share via WhatsApp"
        );
    }
}
