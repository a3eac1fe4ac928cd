//! Score-to-rank mapping for the runner

use serde::{Deserialize, Serialize};

/// Points per rank tier
pub const RANK_STEP: u64 = 15_000;
/// Scores at or above this beat the creator
pub const TOP_TIER_SCORE: u64 = 124_000;
/// The creator's own best run
pub const CREATOR_HIGH_SCORE: u64 = 123_790;

pub const RANK_NAMES: [&str; 8] = [
    "Typical Engineer",
    "Couch Potato",
    "Weekend Jogger",
    "Daily Runner",
    "Local Prospect",
    "Regional Star",
    "National Champ",
    "Second Mo Farah",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    /// Index into `RANK_NAMES`
    Named(usize),
    /// Beyond the last named rank
    BeatCreator,
}

impl Rank {
    pub fn for_score(score: u64) -> Self {
        if score >= TOP_TIER_SCORE {
            Rank::BeatCreator
        } else {
            let index = (score / RANK_STEP) as usize;
            Rank::Named(index.min(RANK_NAMES.len() - 1))
        }
    }

    pub fn index(self) -> usize {
        match self {
            Rank::Named(i) => i,
            Rank::BeatCreator => RANK_NAMES.len(),
        }
    }

    /// Score range label, e.g. "30k-45k"
    pub fn range_label(self) -> String {
        match self {
            Rank::Named(i) if i < RANK_NAMES.len() - 1 => tier_label(i),
            Rank::Named(_) => "105k-124k".to_string(),
            Rank::BeatCreator => "124k+".to_string(),
        }
    }

    pub fn congrats(self) -> String {
        match self {
            Rank::Named(i) => format!("Congrats! You're a {}!", RANK_NAMES[i]),
            Rank::BeatCreator => format!(
                "Congrats! You exceeded the creator's high score of {} and beat the game!",
                CREATOR_HIGH_SCORE
            ),
        }
    }
}

fn tier_label(i: usize) -> String {
    format!("{}k-{}k", i * 15, (i + 1) * 15)
}

/// Lines describing the player's standing
///
/// Terminal summaries start with "Game over!". Below the top tier a hint
/// names the range for the next rank.
pub fn rank_summary(score: u64, end_of_game: bool) -> Vec<String> {
    let rank = Rank::for_score(score);
    let mut lines = Vec::with_capacity(4);
    if end_of_game {
        lines.push("Game over!".to_string());
    }

    lines.push(format!("{} {}", rank.range_label(), rank.congrats()));

    if let Rank::Named(i) = rank {
        let next = if i + 1 < RANK_NAMES.len() {
            Rank::Named(i + 1).range_label()
        } else {
            Rank::BeatCreator.range_label()
        };
        lines.push(format!("{} *Score within this range to earn the next rank*", next));
    }

    let lower: Vec<String> = (0..rank.index())
        .map(|i| format!("{} {}", Rank::Named(i).range_label(), RANK_NAMES[i]))
        .collect();
    if !lower.is_empty() {
        lines.push(lower.join(" "));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_typical_engineer() {
        assert_eq!(Rank::for_score(0), Rank::Named(0));
        let lines = rank_summary(0, true);
        assert_eq!(lines[0], "Game over!");
        assert!(lines[1].contains("Typical Engineer"));
        assert!(lines[2].starts_with("15k-30k"));
    }

    #[test]
    fn test_above_top_tier_beats_creator() {
        assert_eq!(Rank::for_score(130_000), Rank::BeatCreator);
        let lines = rank_summary(130_000, false);
        assert!(lines[0].contains("exceeded the creator's high score"));
        assert!(lines[1].contains("Second Mo Farah"));
        assert!(!lines.iter().any(|l| l.contains("next rank")));
    }

    #[test]
    fn test_last_named_tier_is_capped() {
        assert_eq!(Rank::for_score(105_000), Rank::Named(7));
        assert_eq!(Rank::for_score(123_999), Rank::Named(7));
        assert_eq!(Rank::Named(7).range_label(), "105k-124k");
        assert_eq!(Rank::Named(6).range_label(), "90k-105k");
    }

    #[test]
    fn test_exactly_eight_tiers_below_top() {
        let mut tiers: Vec<Rank> = (0..TOP_TIER_SCORE).step_by(500).map(Rank::for_score).collect();
        tiers.dedup();
        assert_eq!(tiers.len(), RANK_NAMES.len());
    }

    proptest! {
        #[test]
        fn prop_rank_monotonic(a in 0u64..200_000, b in 0u64..200_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Rank::for_score(lo) <= Rank::for_score(hi));
        }
    }
}
