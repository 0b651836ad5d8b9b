//! Leveling curve.
//!
//! A companion at level `L` owns the experience bracket `[L^3, (L+1)^3)`.
//! The service applies this curve authoritatively; every client-side
//! progress display goes through these functions so the two can't drift.
//!
//! All functions are total: arithmetic saturates, and experience that is
//! momentarily outside its level's bracket (a stale snapshot right after an
//! evolution, say) is clamped instead of producing out-of-range progress.

use serde::{Deserialize, Serialize};

/// Experience awarded per full study minute.
pub const EXP_PER_MINUTE: u64 = 50;

/// Experience at which `level` begins.
pub fn exp_floor(level: u32) -> u64 {
    (level as u64).saturating_pow(3)
}

/// Experience at which `level + 1` begins.
pub fn exp_ceil(level: u32) -> u64 {
    (level as u64 + 1).saturating_pow(3)
}

/// Experience gathered inside the current level, clamped to the bracket.
pub fn exp_in_level(level: u32, exp: u64) -> u64 {
    exp.clamp(exp_floor(level), exp_ceil(level)) - exp_floor(level)
}

/// Size of the bracket for `level`.
pub fn exp_span(level: u32) -> u64 {
    exp_ceil(level) - exp_floor(level)
}

/// 0.0 ..= 1.0 progress towards the next level.
pub fn progress_fraction(level: u32, exp: u64) -> f64 {
    let span = exp_span(level);
    if span == 0 {
        return 0.0;
    }
    (exp_in_level(level, exp) as f64 / span as f64).clamp(0.0, 1.0)
}

/// 0.0 ..= 100.0 progress, for bar widths.
pub fn progress_percent(level: u32, exp: u64) -> f64 {
    progress_fraction(level, exp) * 100.0
}

/// Experience still missing for the next level. Zero once the ceiling is reached.
pub fn exp_remaining(level: u32, exp: u64) -> u64 {
    exp_ceil(level).saturating_sub(exp)
}

/// Experience a session of `minutes` is worth.
pub fn exp_for_minutes(minutes: u64) -> u64 {
    minutes.saturating_mul(EXP_PER_MINUTE)
}

/// Highest level whose floor is reached by `exp`. Never below 1.
pub fn level_for_exp(exp: u64) -> u32 {
    let mut level = (exp as f64).cbrt() as u64;
    while level > 0 && level.saturating_pow(3) > exp {
        level -= 1;
    }
    // The top bracket's ceiling does not fit in u64; stop there.
    while (level + 1).checked_pow(3).is_some_and(|cube| cube <= exp) {
        level += 1;
    }
    level.clamp(1, u32::MAX as u64) as u32
}

/// Client-side preview of a companion after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPreview {
    pub level: u32,
    pub exp: u64,
    pub levels_gained: u32,
}

/// Project `minutes` of study onto a companion at `level` with `exp`.
///
/// Display-only. The level never decreases even if `exp` was stale.
pub fn project_session(level: u32, exp: u64, minutes: u64) -> LevelPreview {
    let exp = exp.saturating_add(exp_for_minutes(minutes));
    let projected = level_for_exp(exp).max(level);
    LevelPreview {
        level: projected,
        exp,
        levels_gained: projected - level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_are_cubes() {
        assert_eq!(exp_floor(0), 0);
        assert_eq!(exp_ceil(0), 1);
        assert_eq!(exp_floor(5), 125);
        assert_eq!(exp_ceil(5), 216);
        assert_eq!(exp_span(5), 91);
    }

    #[test]
    fn progress_at_bracket_edges() {
        assert_eq!(progress_fraction(5, 125), 0.0);
        assert_eq!(progress_fraction(5, 216), 1.0);
        let mid = progress_fraction(5, 170);
        assert!((mid - 45.0 / 91.0).abs() < 1e-9);
    }

    #[test]
    fn stale_exp_is_clamped() {
        // Below the floor: an evolution bumped the level before exp refreshed.
        assert_eq!(progress_fraction(16, 100), 0.0);
        assert_eq!(progress_fraction(3, 10_000), 1.0);
        assert_eq!(exp_remaining(3, 10_000), 0);
        assert_eq!(exp_in_level(16, 100), 0);
    }

    #[test]
    fn remaining_counts_to_ceiling() {
        assert_eq!(exp_remaining(5, 130), 86);
        assert_eq!(exp_remaining(0, 0), 1);
    }

    #[test]
    fn level_for_exp_matches_brackets() {
        assert_eq!(level_for_exp(0), 1);
        assert_eq!(level_for_exp(7), 1);
        assert_eq!(level_for_exp(8), 2);
        assert_eq!(level_for_exp(26), 2);
        assert_eq!(level_for_exp(27), 3);
        assert_eq!(level_for_exp(4_096), 16);
        assert_eq!(level_for_exp(u64::MAX), 2_642_245);
    }

    #[test]
    fn project_session_previews_level_ups() {
        // Level 5 with 130 exp, 30 minutes = 1500 exp -> 1630 -> level 11.
        let preview = project_session(5, 130, 30);
        assert_eq!(preview.exp, 1_630);
        assert_eq!(preview.level, 11);
        assert_eq!(preview.levels_gained, 6);

        let none = project_session(5, 130, 0);
        assert_eq!(none.level, 5);
        assert_eq!(none.levels_gained, 0);
    }

    #[test]
    fn huge_sessions_land_in_the_top_bracket() {
        let preview = project_session(5, 130, u64::MAX / EXP_PER_MINUTE + 1);
        assert_eq!(preview.exp, u64::MAX);
        assert_eq!(preview.level, 2_642_245);
        assert_eq!(preview.levels_gained, 2_642_240);
    }

    #[test]
    fn saturates_at_the_top() {
        assert_eq!(exp_floor(u32::MAX), (u32::MAX as u64).saturating_pow(3));
        assert_eq!(exp_for_minutes(u64::MAX), u64::MAX);
        assert!(progress_fraction(u32::MAX, u64::MAX) <= 1.0);
    }
}
