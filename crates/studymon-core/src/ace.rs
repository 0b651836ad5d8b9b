//! Ace companion selection.
//!
//! The ace is the companion with the highest level across all topics,
//! ties broken by experience, then by first occurrence.

use serde::{Deserialize, Serialize};

use crate::leveling;
use crate::model::{Companion, Topic, TopicId};

/// The ace and its experience bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AceProgress {
    pub topic_id: TopicId,
    pub topic_title: String,
    pub companion: Companion,
    /// Experience gathered inside the current level
    pub exp_in_level: u64,
    /// Size of the current level's bracket
    pub exp_needed: u64,
    pub exp_remaining: u64,
    /// 0.0 ..= 1.0
    pub progress: f64,
}

impl AceProgress {
    pub fn for_topic(topic: &Topic, companion: Companion) -> Self {
        let (level, exp) = (companion.level, companion.exp);
        Self {
            topic_id: topic.id,
            topic_title: topic.title.clone(),
            exp_in_level: leveling::exp_in_level(level, exp),
            exp_needed: leveling::exp_span(level),
            exp_remaining: leveling::exp_remaining(level, exp),
            progress: leveling::progress_fraction(level, exp),
            companion,
        }
    }

    pub fn percent(&self) -> f64 {
        self.progress * 100.0
    }
}

/// Topic whose companion is the ace, with that companion.
pub fn select_ace(topics: &[Topic]) -> Option<(&Topic, Companion)> {
    let mut best: Option<(&Topic, Companion)> = None;
    for topic in topics {
        let Some(companion) = topic.companion() else {
            continue;
        };
        let better = match &best {
            None => true,
            Some((_, current)) => {
                (companion.level, companion.exp) > (current.level, current.exp)
            }
        };
        if better {
            best = Some((topic, companion));
        }
    }
    best
}

/// Ace selection plus its progress values, `None` without companions.
pub fn ace_progress(topics: &[Topic]) -> Option<AceProgress> {
    select_ace(topics).map(|(topic, companion)| AceProgress::for_topic(topic, companion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::topic;

    fn with_companion(id: i64, name: &str, level: u32, exp: u64) -> Topic {
        let mut t = topic(id, &format!("Topic {id}"));
        t.pokemon_id = Some(id * 10);
        t.pokemon_name = Some(name.to_string());
        t.pokemon_level = Some(level);
        t.pokemon_exp = Some(exp);
        t
    }

    #[test]
    fn none_without_companions() {
        assert!(select_ace(&[topic(1, "Math")]).is_none());
        assert!(ace_progress(&[]).is_none());
    }

    #[test]
    fn highest_level_wins() {
        let topics = vec![
            with_companion(1, "Pidgey", 3, 30),
            with_companion(2, "Abra", 7, 400),
            topic(3, "No creature"),
        ];
        let (topic, companion) = select_ace(&topics).unwrap();
        assert_eq!(topic.id, 2);
        assert_eq!(companion.name, "Abra");
    }

    #[test]
    fn experience_breaks_level_ties() {
        let topics = vec![
            with_companion(1, "Pidgey", 5, 130),
            with_companion(2, "Zubat", 5, 200),
        ];
        assert_eq!(select_ace(&topics).unwrap().0.id, 2);
    }

    #[test]
    fn full_tie_keeps_first() {
        let topics = vec![
            with_companion(1, "Pidgey", 5, 130),
            with_companion(2, "Zubat", 5, 130),
        ];
        assert_eq!(select_ace(&topics).unwrap().0.id, 1);
    }

    #[test]
    fn progress_values_follow_curve() {
        let topics = vec![with_companion(1, "Charmander", 5, 170)];
        let ace = ace_progress(&topics).unwrap();
        assert_eq!(ace.exp_in_level, 45);
        assert_eq!(ace.exp_needed, 91);
        assert_eq!(ace.exp_remaining, 46);
        assert!((ace.percent() - 45.0 / 91.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn stale_snapshot_is_clamped() {
        let topics = vec![with_companion(1, "Charmeleon", 16, 3_000)];
        let ace = ace_progress(&topics).unwrap();
        assert_eq!(ace.progress, 0.0);
        assert_eq!(ace.exp_in_level, 0);
    }
}
