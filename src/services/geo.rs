use crate::models::ReferenceCity;

/// Earth mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixed reference set for nearest-city resolution, scanned in order.
pub const REFERENCE_CITIES: &[ReferenceCity] = &[
    ReferenceCity {
        name: "Fresnillo",
        country: "Mexico",
        latitude: 40.4168,
        longitude: -3.7038,
    },
    ReferenceCity {
        name: "Zacatecas",
        country: "Mexico",
        latitude: 41.3851,
        longitude: 2.1734,
    },
    ReferenceCity {
        name: "Jerez",
        country: "Mexico",
        latitude: 39.4699,
        longitude: -0.3763,
    },
    ReferenceCity {
        name: "Calera",
        country: "Mexico",
        latitude: 37.3891,
        longitude: -5.9845,
    },
    ReferenceCity {
        name: "Sombrerete",
        country: "Mexico",
        latitude: 43.2627,
        longitude: -2.9253,
    },
];

/// Great-circle distance between two coordinates in kilometers (haversine).
///
/// Pure and symmetric; identical points yield 0. Inputs are decimal degrees
/// and are not range-checked, so out-of-range values produce a well-defined
/// but meaningless result.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Nearest entry in the reference set, ties broken by first occurrence.
/// `None` only when the set is empty.
pub fn nearest_city(latitude: f64, longitude: f64) -> Option<&'static ReferenceCity> {
    let mut closest: Option<(&ReferenceCity, f64)> = None;

    for city in REFERENCE_CITIES {
        let d = distance_km(latitude, longitude, city.latitude, city.longitude);
        match closest {
            Some((_, best)) if d >= best => {}
            _ => closest = Some((city, d)),
        }
    }

    closest.map(|(city, _)| city)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_identical_points() {
        assert_eq!(distance_km(40.4168, -3.7038, 40.4168, -3.7038), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = distance_km(52.5200, 13.4050, 48.8566, 2.3522);
        let ba = distance_km(48.8566, 2.3522, 52.5200, 13.4050);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_distance_berlin_paris() {
        // Berlin to Paris is roughly 878 km.
        let d = distance_km(52.5200, 13.4050, 48.8566, 2.3522);
        assert!((d - 878.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_distance_grows_with_separation() {
        let near = distance_km(40.0, -3.0, 40.1, -3.0);
        let far = distance_km(40.0, -3.0, 41.0, -3.0);
        assert!(near < far);
    }

    #[test]
    fn test_nearest_city_picks_minimum_distance() {
        // Right on top of the Jerez reference point.
        let city = nearest_city(39.4699, -0.3763).unwrap();
        assert_eq!(city.name, "Jerez");
        assert_eq!(city.country, "Mexico");
    }

    #[test]
    fn test_nearest_city_close_to_fresnillo() {
        let city = nearest_city(40.40, -3.70).unwrap();
        assert_eq!(city.name, "Fresnillo");
    }
}
