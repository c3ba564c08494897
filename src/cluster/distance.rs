use std::f64::consts::PI;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in kilometers
pub const EARTH_R: f64 = 6371.0;

/// Rough length of one degree of arc, used to turn a km radius into degrees
pub const KM_PER_DEGREE: f64 = 111.0;

/// Central angle between two points in radians (haversine, atan2 form)
///
/// `a` is clamped to `[0, 1]` so rounding near coincident or antipodal points
/// cannot push `sqrt(1 - a)` out of its domain.
fn central_angle_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEGREE_RAD;
    let phi2 = lat2 * DEGREE_RAD;
    let d_phi = (lat2 - lat1) * DEGREE_RAD;
    let d_lambda = (lon2 - lon1) * DEGREE_RAD;

    let s1 = (d_phi / 2.0).sin();
    let s2 = (d_lambda / 2.0).sin();
    let a = (s1 * s1 + phi1.cos() * phi2.cos() * s2 * s2).clamp(0.0, 1.0);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Calculates great-circle distance between two points
///
/// Coordinates are in degrees and are not range-checked here.
///
/// # Returns
///
/// Distance in kilometers
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_R * central_angle_rad(lat1, lon1, lat2, lon2)
}

/// Calculates great-circle separation between two points in degrees of arc
///
/// This is the metric of approximate-degrees clustering, where the radius is
/// `eps_km / KM_PER_DEGREE`.
pub fn central_angle_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    central_angle_rad(lat1, lon1, lat2, lon2) / DEGREE_RAD
}

/// Converts a clustering radius in kilometers to the approximate degree radius
pub fn eps_km_to_degrees(eps_km: f64) -> f64 {
    eps_km / KM_PER_DEGREE
}
