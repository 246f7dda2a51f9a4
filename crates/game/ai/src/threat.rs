//! Threat derived from distance and disposition. Never stored.

use crate::disposition::Disposition;

/// Danger posed by a relationship at `distance`.
///
/// Linear proximity falloff to zero at `aggro_radius`, scaled by the
/// hostility of `disposition`. Non-hostile dispositions yield zero.
pub fn relationship_threat(distance: u32, aggro_radius: u32, disposition: Disposition) -> f32 {
    proximity(distance, aggro_radius) * disposition.hostility()
}

/// Threat synthesized for a remembered attacker when relationship threat is
/// zero. Uses the plain hostility signal so that merely unfriendly attackers
/// still register.
pub fn awareness_threat(distance: u32, awareness_radius: u32, disposition: Disposition) -> f32 {
    proximity(distance, awareness_radius) * disposition.hostility_signal()
}

/// `1 − distance/radius`, zero at or beyond the radius.
pub fn proximity(distance: u32, radius: u32) -> f32 {
    if radius == 0 || distance >= radius {
        return 0.0;
    }
    (1.0 - distance as f32 / radius as f32).clamp(0.0, 1.0)
}
