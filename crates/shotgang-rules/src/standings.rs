//! Results screen ordering and winner selection.

use shotgang_core::components::Player;
use shotgang_core::types::Color;

/// Sort by `wins * 100 + kills`, highest first. Equal scores keep their order.
pub fn sort_standings(players: &mut [Player]) {
    players.sort_by(|a, b| b.score_key().cmp(&a.score_key()));
}

fn same_score(a: &Player, b: &Player) -> bool {
    a.wins == b.wins && a.kills == b.kills
}

/// Index of the player named on the banner, if any.
///
/// On the final level the match leader wins outright unless tied with the
/// runner-up. Otherwise it is the first living player in standings order.
pub fn winning_player(sorted: &[Player], final_results: bool) -> Option<usize> {
    if final_results {
        match sorted {
            [_] => return Some(0),
            [first, second, ..] if !same_score(first, second) => return Some(0),
            _ => {}
        }
    }
    sorted.iter().position(|p| !p.is_dead())
}

pub fn banner_text(winner: Option<&Player>) -> String {
    match winner {
        Some(p) => format!("{} WINS!", p.name),
        None => "DRAW".to_string(),
    }
}

pub fn banner_color(winner: Option<&Player>, final_winner: bool) -> Color {
    match winner {
        Some(_) if final_winner => Color::GOLD,
        Some(p) => p.color,
        None => Color::WHITE,
    }
}
