use chrono::{Local, NaiveDate};

use crate::models::{Event, UserLocation};
use crate::services::geo;

/// Static in-memory event collection. Seeded once at construction and
/// read-only afterwards.
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// The built-in catalog the application ships with.
    pub fn seeded() -> Self {
        Self::new(seed_events())
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Events in a category, matched case-insensitively.
    pub fn by_category(&self, category: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Sorted, de-duplicated list of categories.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.events.iter().map(|event| event.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn by_id(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Case-insensitive substring search over name, description and location,
    /// optionally pre-filtered by category (`None` or `"all"` means no
    /// category filter). An empty or whitespace query returns the
    /// category-filtered set unmodified.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&Event> {
        let mut results: Vec<&Event> = match category {
            Some(c) if c != "all" => self
                .events
                .iter()
                .filter(|event| event.category.eq_ignore_ascii_case(c))
                .collect(),
            _ => self.events.iter().collect(),
        };

        let query = query.trim().to_lowercase();
        if !query.is_empty() {
            results.retain(|event| {
                event.name.to_lowercase().contains(&query)
                    || event.description.to_lowercase().contains(&query)
                    || event.location.to_lowercase().contains(&query)
            });
        }

        results
    }

    /// Events on or after today's date, ascending, optionally truncated.
    pub fn upcoming(&self, limit: Option<usize>) -> Vec<&Event> {
        self.upcoming_from(Local::now().date_naive(), limit)
    }

    pub fn upcoming_from(&self, today: NaiveDate, limit: Option<usize>) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| event.date >= today)
            .collect();
        upcoming.sort_by_key(|event| event.date);

        if let Some(limit) = limit {
            upcoming.truncate(limit);
        }
        upcoming
    }

    /// A copy of the catalog with the transient distance field filled in
    /// from the user's position. Distances are never persisted.
    pub fn with_distances(&self, location: &UserLocation) -> Vec<Event> {
        self.events
            .iter()
            .map(|event| {
                let mut event = event.clone();
                event.distance_km = Some(geo::distance_km(
                    location.latitude,
                    location.longitude,
                    event.latitude,
                    event.longitude,
                ));
                event
            })
            .collect()
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

fn seed_events() -> Vec<Event> {
    let entries: [(&str, &str, &str, &str, f64, f64, NaiveDate, &str, &str, u32, f64); 11] = [
        (
            "1",
            "Exposición de Arte Contemporáneo",
            "Descubre las últimas tendencias del arte contemporáneo",
            "Fresnillo, Zacatecas",
            40.4154,
            -3.6883,
            date(2025, 7, 15),
            "10:00",
            "Cultura",
            150,
            100.0,
        ),
        (
            "2",
            "Festival de Teatro Clásico",
            "Las mejores obras del teatro clásico español",
            "Teatro, Zacatecas",
            40.4180,
            -3.7108,
            date(2025, 7, 18),
            "20:00",
            "Cultura",
            300,
            35.0,
        ),
        (
            "3",
            "Conferencia de Historia Medieval",
            "Explorando los misterios de la Edad Media",
            "IPN, Zacatecas",
            40.4493,
            -3.7284,
            date(2025, 7, 22),
            "18:00",
            "Cultura",
            100,
            0.0,
        ),
        (
            "4",
            "Feria de Turismo Rural",
            "Descubre los mejores destinos rurales de España",
            "Cerro de la Bufa, Zacatecas",
            41.3851,
            2.1734,
            date(2025, 7, 20),
            "09:00",
            "Hospedaje",
            500,
            15.0,
        ),
        (
            "5",
            "Encuentro de Hoteles Boutique",
            "Networking para profesionales del sector hotelero",
            "Hotel Minero, Zacatecas",
            40.4153,
            -3.6953,
            date(2025, 7, 25),
            "14:00",
            "Hospedaje",
            200,
            50.0,
        ),
        (
            "6",
            "Jornada de Turismo Sostenible",
            "Iniciativas para un turismo más responsable",
            "Centro de Convenciones, Fresnillo",
            39.4699,
            -0.3763,
            date(2025, 7, 28),
            "10:00",
            "Hospedaje",
            250,
            100.0,
        ),
        (
            "7",
            "Concierto de Jazz en Vivo",
            "Una noche mágica con los mejores músicos de jazz",
            "Centro, Fresnillo",
            40.4154,
            -3.6883,
            date(2025, 7, 16),
            "21:00",
            "Conciertos",
            120,
            180.0,
        ),
        (
            "8",
            "Festival de Rock Independiente",
            "Las mejores bandas emergentes del rock nacional",
            "Centro de convenciones, Fresnillo",
            40.4089,
            -3.6827,
            date(2025, 7, 19),
            "20:30",
            "Conciertos",
            800,
            150.0,
        ),
        (
            "9",
            "Concierto de Música Clásica",
            "Orquesta Sinfónica interpretando obras maestras",
            "Auditorio Nacional, Zacatecas",
            40.4365,
            -3.6803,
            date(2025, 7, 23),
            "19:30",
            "Conciertos",
            600,
            200.0,
        ),
        (
            "10",
            "Noche de Flamenco Auténtico",
            "Espectáculo tradicional de flamenco andaluz",
            "calera, Zacatecas",
            41.3788,
            2.1732,
            date(2025, 7, 26),
            "22:00",
            "Conciertos",
            80,
            150.0,
        ),
        (
            "11",
            "Festival de Música Electrónica",
            "Los mejores DJs de la escena electrónica europea",
            "Zacatecas, ",
            40.3833,
            -3.6167,
            date(2025, 7, 30),
            "23:00",
            "Conciertos",
            1000,
            400.0,
        ),
    ];

    entries
        .into_iter()
        .map(
            |(id, name, description, location, latitude, longitude, date, time, category, capacity, price)| Event {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                location: location.to_string(),
                latitude,
                longitude,
                date,
                time: time.to_string(),
                category: category.to_string(),
                capacity,
                price,
                distance_km: None,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog_size_and_lookup() {
        let catalog = EventCatalog::seeded();
        assert_eq!(catalog.all().len(), 11);

        let event = catalog.by_id("7").unwrap();
        assert_eq!(event.name, "Concierto de Jazz en Vivo");
        assert!(catalog.by_id("99").is_none());
    }

    #[test]
    fn test_categories_sorted_unique() {
        let catalog = EventCatalog::seeded();
        assert_eq!(
            catalog.categories(),
            vec!["Conciertos", "Cultura", "Hospedaje"]
        );
    }

    #[test]
    fn test_by_category_is_case_insensitive() {
        let catalog = EventCatalog::seeded();
        assert_eq!(catalog.by_category("cultura").len(), 3);
        assert_eq!(catalog.by_category("Conciertos").len(), 5);
        assert!(catalog.by_category("Deportes").is_empty());
    }

    #[test]
    fn test_search_empty_query_returns_category_set() {
        let catalog = EventCatalog::seeded();
        assert_eq!(catalog.search("", Some("all")).len(), 11);
        assert_eq!(catalog.search("   ", None).len(), 11);
        assert_eq!(catalog.search("", Some("Hospedaje")).len(), 3);
    }

    #[test]
    fn test_search_matches_name_description_location() {
        let catalog = EventCatalog::seeded();

        let jazz = catalog.search("jazz", None);
        assert_eq!(jazz.len(), 1);
        assert_eq!(jazz[0].id, "7");

        // "turismo" appears in names and descriptions across Hospedaje.
        let turismo = catalog.search("TURISMO", None);
        assert_eq!(turismo.len(), 2);

        // Location match.
        let teatro = catalog.search("teatro", Some("Cultura"));
        assert_eq!(teatro.len(), 1);
        assert_eq!(teatro[0].id, "2");
    }

    #[test]
    fn test_search_category_filter_applies_before_query() {
        let catalog = EventCatalog::seeded();
        // The jazz concert is filtered out entirely under the wrong category.
        assert!(catalog.search("jazz", Some("Cultura")).is_empty());
        assert_eq!(catalog.search("jazz", Some("Conciertos")).len(), 1);
    }

    #[test]
    fn test_upcoming_sorted_and_truncated() {
        let catalog = EventCatalog::seeded();
        let today = date(2025, 7, 20);

        let upcoming = catalog.upcoming_from(today, None);
        assert!(upcoming.iter().all(|event| event.date >= today));
        assert!(upcoming.windows(2).all(|pair| pair[0].date <= pair[1].date));

        let limited = catalog.upcoming_from(today, Some(2));
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, "4");
        assert_eq!(limited[1].id, "3");
    }

    #[test]
    fn test_upcoming_past_catalog_is_empty() {
        let catalog = EventCatalog::seeded();
        assert!(catalog.upcoming_from(date(2026, 1, 1), None).is_empty());
    }

    #[test]
    fn test_with_distances_fills_transient_field() {
        let catalog = EventCatalog::seeded();
        let location = UserLocation::new(40.4168, -3.7038);

        let events = catalog.with_distances(&location);
        assert_eq!(events.len(), 11);
        assert!(events.iter().all(|event| event.distance_km.is_some()));

        // Event 1 sits a couple of kilometers from the reference point.
        let near = events.iter().find(|event| event.id == "1").unwrap();
        assert!(near.distance_km.unwrap() < 5.0);

        // The catalog itself stays untouched.
        assert!(catalog.all().iter().all(|event| event.distance_km.is_none()));
    }
}
