//! Pit scoring and failure detection
//!
//! Both scans are plain (zone, particle) double loops. Height is ignored: a
//! particle counts for a pit as soon as it is over it.

use super::state::{SoilParticle, Zone};

/// Particles over a pit of their own color, summed over all pits
///
/// Carried particles count too. A particle over two overlapping pits is
/// counted once per pit.
pub fn count_correct(zones: &[Zone], particles: &[SoilParticle]) -> usize {
    zones
        .iter()
        .map(|zone| correct_in_zone(zone, particles))
        .sum()
}

/// Per-pit version of [`count_correct`], in pit order
pub fn zone_progress(zones: &[Zone], particles: &[SoilParticle]) -> Vec<usize> {
    zones
        .iter()
        .map(|zone| correct_in_zone(zone, particles))
        .collect()
}

fn correct_in_zone(zone: &Zone, particles: &[SoilParticle]) -> usize {
    particles
        .iter()
        .filter(|p| p.color == zone.color && zone.contains(p.position))
        .count()
}

/// True as soon as one free particle rests in a pit of another color
pub fn detect_failure(zones: &[Zone], particles: &[SoilParticle]) -> bool {
    zones.iter().any(|zone| {
        particles
            .iter()
            .any(|p| !p.is_attached() && p.color != zone.color && zone.contains(p.position))
    })
}
