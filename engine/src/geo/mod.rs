use shared_types::{GeoPoint, GeoVerification, Territory};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixes coarser than this are not trusted for verification
pub const MAX_ACCURACY_METERS: f64 = 1000.0;

/// Below this distance the UI tells the user how far away they are
const NEARBY_MESSAGE_METERS: f64 = 10_000.0;

/// Great-circle distance between two points, in km
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn haversine_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    haversine_km(from, to) * 1000.0
}

/// Checks a position fix against the user's territories.
///
/// Territories are scanned in the order given and the first geofence that
/// contains the point is returned, even when a later fence is closer. When
/// nothing matches, the distance to the closest fence centre is reported.
/// A fix with accuracy worse than [`MAX_ACCURACY_METERS`] never matches.
pub fn verify(point: GeoPoint, accuracy_meters: f64, territories: &[Territory]) -> GeoVerification {
    if !(accuracy_meters <= MAX_ACCURACY_METERS) {
        return GeoVerification {
            accuracy_accepted: false,
            matched_territory_id: None,
            matched_territory_name: None,
            nearest_distance_meters: None,
        };
    }

    let mut nearest: Option<f64> = None;

    for territory in territories {
        let Some((centre, radius)) = territory.geofence() else {
            continue;
        };

        let distance = haversine_meters(point, centre);
        if distance <= radius {
            return GeoVerification {
                accuracy_accepted: true,
                matched_territory_id: Some(territory.id.clone()),
                matched_territory_name: Some(territory.name.clone()),
                nearest_distance_meters: Some(distance),
            };
        }

        nearest = Some(match nearest {
            Some(current) if current <= distance => current,
            _ => distance,
        });
    }

    GeoVerification {
        accuracy_accepted: true,
        matched_territory_id: None,
        matched_territory_name: None,
        nearest_distance_meters: nearest,
    }
}

/// Human readable outcome of a verification, as shown next to the punch button
pub fn status_message(verification: &GeoVerification, accuracy_meters: f64) -> String {
    if !verification.accuracy_accepted {
        return format!(
            "GPS signal too weak (Accuracy: {}m). Please move outdoors.",
            accuracy_meters.round()
        );
    }

    if let Some(name) = &verification.matched_territory_name {
        return format!("Verified: Inside {}", name);
    }

    match verification.nearest_distance_meters {
        Some(distance) if distance < NEARBY_MESSAGE_METERS => format!(
            "Warning: You are {}m away from closest territory.",
            distance.round()
        ),
        _ => "Warning: You are not inside any assigned geofenced territory.".to_string(),
    }
}
