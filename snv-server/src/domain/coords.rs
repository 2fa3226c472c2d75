//! Coordinate checks.
//!
//! Only coarse validation: the road inventory is Brazilian, so a point
//! outside the country's bounding region can never resolve.

/// Whether `lat`/`lng` are finite and within WGS84 ranges.
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// Whether a point lies inside Brazil's simplified bounding region.
///
/// The region is a rectangle with the ocean east of Pernambuco and south of
/// Fernando de Noronha cut out. Border irregularities are ignored.
pub fn is_in_brazil(lat: f64, lng: f64) -> bool {
    if !is_valid_coordinate(lat, lng) {
        return false;
    }

    // East of Fernando de Noronha
    if lng >= -32.38 {
        return false;
    }
    // West of Acre
    if lng <= -74.20 {
        return false;
    }
    // South of Rio Grande do Sul
    if lat <= -33.77 {
        return false;
    }
    // North of Roraima
    if lat >= 5.40 {
        return false;
    }
    // Open sea east of Pernambuco, south of Fernando de Noronha
    !(lng >= -34.75 && lat <= -3.90)
}
