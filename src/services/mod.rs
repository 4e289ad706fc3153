// Services module - Business logic

pub mod catalog;
pub mod geo;
pub mod location;
pub mod qr;
pub mod reservations;
pub mod whatsapp;
