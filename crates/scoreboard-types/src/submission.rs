//! Normalization of raw score submissions.
//!
//! Clients post loosely typed JSON. [`Submission::from_json`] turns that body
//! into a typed [`Submission`] or a [`Rejection`] carrying the reason string
//! that is returned to the client verbatim. Nothing rejected here ever reaches
//! the store.
//!
//! # Rules
//!
//! | Field | Accepted input | Normalization | Rejection |
//! |-------|----------------|---------------|-----------|
//! | `player` | string, number, bool, null, missing | trim, keep first 3 characters | empty result |
//! | `score` | number, numeric string | floor | non-finite, `< 0`, `> 1e9` |
//!
//! `player` is checked before `score`, so a body that fails both reports
//! `player required`.

use serde_json::Value;

use crate::entry::{MAX_PLAYER_CHARS, MAX_SCORE};

/// Why a submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The player label was missing or blank after trimming.
    #[error("player required")]
    PlayerRequired,

    /// The score was not a finite number in `[0, 1e9]`.
    #[error("invalid score")]
    InvalidScore,
}

impl Rejection {
    /// The reason string sent back to the client.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::PlayerRequired => "player required",
            Self::InvalidScore => "invalid score",
        }
    }
}

/// A validated, normalized submission ready to be appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Trimmed player label, 1 to 3 characters.
    pub player: String,
    /// Floored score in `[0, 1_000_000_000]`.
    pub score: i64,
}

impl Submission {
    /// Normalize a raw JSON request body.
    ///
    /// Anything other than a JSON object is treated as an empty object.
    pub fn from_json(body: &Value) -> Result<Self, Rejection> {
        let fields = body.as_object();
        let player = normalize_player(&player_text(fields.and_then(|f| f.get("player"))))?;
        let score = score_number(fields.and_then(|f| f.get("score")))
            .ok_or(Rejection::InvalidScore)
            .and_then(normalize_score)?;
        Ok(Self { player, score })
    }
}

/// Trim surrounding whitespace and keep at most the first three characters.
///
/// Truncation counts Unicode scalar values, so a multi-byte character is
/// never split.
pub fn normalize_player(raw: &str) -> Result<String, Rejection> {
    let player: String = raw.trim().chars().take(MAX_PLAYER_CHARS).collect();
    if player.is_empty() {
        return Err(Rejection::PlayerRequired);
    }
    Ok(player)
}

/// Range-check a score and floor it to an integer.
pub fn normalize_score(value: f64) -> Result<i64, Rejection> {
    if !value.is_finite() || value < 0.0 || value > f64::from(MAX_SCORE) {
        return Err(Rejection::InvalidScore);
    }
    // Range-checked above: the floored value fits in i64 exactly.
    #[allow(clippy::cast_possible_truncation)]
    let score = value.floor() as i64;
    Ok(score)
}

/// Text form of the `player` field.
fn player_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => String::new(),
    }
}

/// Numeric form of the `score` field, if it has one.
fn score_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use serde_json::json;

    use super::*;

    fn submit(body: &Value) -> Result<Submission, Rejection> {
        Submission::from_json(body)
    }

    #[test]
    fn accepts_plain_submission() {
        let s = submit(&json!({"player": "ann", "score": 42})).unwrap();
        assert_eq!(s.player, "ann");
        assert_eq!(s.score, 42);
    }

    #[test]
    fn trims_and_truncates_player() {
        let s = submit(&json!({"player": "  alice  ", "score": 1})).unwrap();
        assert_eq!(s.player, "ali");
    }

    #[test]
    fn truncates_by_character_not_byte() {
        let s = submit(&json!({"player": "ÿéüß", "score": 1})).unwrap();
        assert_eq!(s.player, "ÿéü");

        let s = submit(&json!({"player": "🎮🎯🏆🥇", "score": 1})).unwrap();
        assert_eq!(s.player.chars().count(), 3);
    }

    #[test]
    fn empty_or_blank_player_is_rejected() {
        assert_eq!(
            submit(&json!({"player": "", "score": 5})),
            Err(Rejection::PlayerRequired)
        );
        assert_eq!(
            submit(&json!({"player": "   ", "score": 5})),
            Err(Rejection::PlayerRequired)
        );
        assert_eq!(
            submit(&json!({"player": null, "score": 5})),
            Err(Rejection::PlayerRequired)
        );
        assert_eq!(submit(&json!({"score": 5})), Err(Rejection::PlayerRequired));
        assert_eq!(
            submit(&json!({"player": {"name": "x"}, "score": 5})),
            Err(Rejection::PlayerRequired)
        );
    }

    #[test]
    fn non_string_player_is_coerced_to_text() {
        let s = submit(&json!({"player": 12345, "score": 1})).unwrap();
        assert_eq!(s.player, "123");
        let s = submit(&json!({"player": true, "score": 1})).unwrap();
        assert_eq!(s.player, "tru");
    }

    #[test]
    fn container_players_read_as_empty() {
        for player in [json!([1, 2]), json!({}), json!({"name": "ann"})] {
            assert_eq!(
                submit(&json!({"player": player, "score": 1})),
                Err(Rejection::PlayerRequired),
                "player {player} should be rejected"
            );
        }
    }

    #[test]
    fn player_is_checked_before_score() {
        assert_eq!(
            submit(&json!({"player": "", "score": -1})),
            Err(Rejection::PlayerRequired)
        );
    }

    #[test]
    fn non_object_body_reads_as_empty() {
        assert_eq!(submit(&Value::Null), Err(Rejection::PlayerRequired));
        assert_eq!(submit(&json!([1, 2])), Err(Rejection::PlayerRequired));
        assert_eq!(submit(&json!("ann")), Err(Rejection::PlayerRequired));
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        for score in [json!(-1), json!(-0.5), json!(1_000_000_001), json!(1e10)] {
            assert_eq!(
                submit(&json!({"player": "bob", "score": score})),
                Err(Rejection::InvalidScore),
                "score {score} should be rejected"
            );
        }
    }

    #[test]
    fn non_numeric_scores_are_rejected() {
        for score in [
            json!(null),
            json!(true),
            json!(false),
            json!("abc"),
            json!(""),
            json!("NaN"),
            json!("Infinity"),
            json!([5]),
            json!({}),
        ] {
            assert_eq!(
                submit(&json!({"player": "bob", "score": score})),
                Err(Rejection::InvalidScore),
                "score {score} should be rejected"
            );
        }
        assert_eq!(submit(&json!({"player": "bob"})), Err(Rejection::InvalidScore));
    }

    #[test]
    fn boundary_scores_are_accepted() {
        let low = submit(&json!({"player": "b", "score": 0})).unwrap();
        assert_eq!(low.score, 0);
        let high = submit(&json!({"player": "b", "score": 1_000_000_000}))
            .unwrap();
        assert_eq!(high.score, 1_000_000_000);
    }

    #[test]
    fn fractional_scores_are_floored() {
        let s = submit(&json!({"player": "xy", "score": 3.9})).unwrap();
        assert_eq!(s.score, 3);
        let s = submit(&json!({"player": "xy", "score": "7.2"})).unwrap();
        assert_eq!(s.score, 7);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let s = submit(&json!({"player": "zed", "score": " 250 "})).unwrap();
        assert_eq!(s.score, 250);
    }

    #[test]
    fn typed_helpers_apply_same_rules() {
        assert_eq!(normalize_player(" cat "), Ok(String::from("cat")));
        assert_eq!(normalize_player(" \t "), Err(Rejection::PlayerRequired));
        assert_eq!(normalize_score(9.99), Ok(9));
        assert_eq!(normalize_score(f64::NAN), Err(Rejection::InvalidScore));
        assert_eq!(normalize_score(f64::INFINITY), Err(Rejection::InvalidScore));
    }

    #[test]
    fn upper_bound_comes_from_max_score() {
        let max = f64::from(MAX_SCORE);
        assert_eq!(normalize_score(max), Ok(i64::from(MAX_SCORE)));
        assert_eq!(normalize_score(max + 0.5), Err(Rejection::InvalidScore));
        assert_eq!(normalize_score(max + 1.0), Err(Rejection::InvalidScore));
    }

    #[test]
    fn reasons_match_display() {
        for r in [Rejection::PlayerRequired, Rejection::InvalidScore] {
            assert_eq!(r.reason(), r.to_string());
        }
    }
}
