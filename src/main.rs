use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reserva::config::Config;
use reserva::services::catalog::EventCatalog;
use reserva::services::reservations::ReservationStore;
use reserva::services::whatsapp::WhatsAppNotifier;
use reserva::storage::JsonFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reserva=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    run().await?;
    Ok(())
}

async fn run() -> reserva::error::Result<()> {
    tracing::info!("Starting reserva...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir,
        auto_share = config.auto_share,
        "Configuration loaded"
    );

    // Wire the store against the durable file-backed entry
    let storage = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    let mut reservations = ReservationStore::new(storage, Arc::new(WhatsAppNotifier));
    reservations.load().await;

    let catalog = EventCatalog::seeded();
    tracing::info!(
        events = catalog.all().len(),
        categories = ?catalog.categories(),
        "Event catalog ready"
    );

    for event in catalog.upcoming(Some(5)) {
        tracing::info!(
            id = %event.id,
            date = %event.date,
            name = %event.name,
            "Upcoming event"
        );
    }

    let stats = reservations.stats();
    tracing::info!(
        total = stats.total,
        confirmed = stats.confirmed,
        pending = stats.pending,
        cancelled = stats.cancelled,
        "Reservation stats"
    );

    Ok(())
}
