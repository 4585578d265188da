use super::Vec3;

/// Clamp latitude to its physical range.
pub fn clamp_latitude_deg(lat_deg: f64) -> f64 {
    lat_deg.clamp(-90.0, 90.0)
}

/// Wrap longitude into [-180, 180). Longitude is cyclic, so any finite input
/// is acceptable.
pub fn wrap_longitude_deg(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Maps geographic coordinates onto a sphere of the given radius, in the
/// sphere's local (untransformed) frame.
///
/// Convention (must match the equirectangular texture mapping):
///
/// ```text
/// phi   = radians(90 - lat)
/// theta = radians(lon + 180)
/// x = -r sin(phi) cos(theta)
/// z =  r sin(phi) sin(theta)
/// y =  r cos(phi)
/// ```
///
/// The 180-degree longitude offset and the axis permutation are load-bearing:
/// changing either silently misaligns every surface anchor from its visual
/// landmark.
pub fn latlon_to_sphere(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let lat = clamp_latitude_deg(lat_deg);
    let lon = wrap_longitude_deg(lon_deg);

    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}
