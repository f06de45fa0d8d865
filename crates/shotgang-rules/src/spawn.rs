//! Spawn coordinate selection.

use shotgang_core::types::Vec2;

/// Pick the spawn point farthest from its nearest player.
///
/// With no players every point is infinitely far away and the first one
/// wins. Ties keep the earlier point. No points (or no point farther than
/// zero) yields the origin.
pub fn find_spawn_coordinate(points: &[Vec2], players: &[Vec2]) -> Vec2 {
    let mut best: Option<Vec2> = None;
    let mut longest = 0.0_f32;

    for &point in points {
        let nearest = players
            .iter()
            .map(|p| p.distance(point))
            .fold(f32::INFINITY, f32::min);

        if nearest > longest {
            longest = nearest;
            best = Some(point);
        }
    }

    best.unwrap_or(Vec2::ZERO)
}
