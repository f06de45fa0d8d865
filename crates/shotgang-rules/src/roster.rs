//! Player names and colors.

use rand::seq::SliceRandom;
use rand::Rng;
use shotgang_core::types::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpec {
    pub name: String,
    pub color: Color,
}

pub const ROSTER: [(&str, [u8; 3]); 6] = [
    ("Knut-Tore", [232, 97, 97]),
    ("Finn-Olav", [97, 133, 232]),
    ("Kris-Ove", [232, 97, 221]),
    ("Bent-Arne", [209, 143, 63]),
    ("Stig-Jonny", [119, 209, 63]),
    ("Nils-Roger", [99, 67, 161]),
];

/// Random roster entry not in `taken`. Falls back to `P<player_count>` in white.
pub fn pick_player_spec<R: Rng + ?Sized>(
    taken: &[&str],
    player_count: usize,
    rng: &mut R,
) -> PlayerSpec {
    let mut order: Vec<usize> = (0..ROSTER.len()).collect();
    order.shuffle(rng);

    order
        .into_iter()
        .map(|i| ROSTER[i])
        .find(|(name, _)| !taken.contains(name))
        .map(|(name, [r, g, b])| PlayerSpec {
            name: name.to_string(),
            color: Color::from_rgb8(r, g, b),
        })
        .unwrap_or_else(|| PlayerSpec {
            name: format!("P{player_count}"),
            color: Color::WHITE,
        })
}
