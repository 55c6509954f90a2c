use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::SessionDefaults;
use crate::model::{Difficulty, GameState, WordResult};

/// Every persisted field of a game session.
///
/// Serialized as one JSON object with camelCase keys; this is the blob
/// written under the session key on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub team1_name: String,
    pub team2_name: String,
    pub team1_score: i64,
    pub team2_score: i64,
    pub team1_rounds_played: u32,
    pub team2_rounds_played: u32,
    pub round_duration: u32,
    pub difficulty: Difficulty,
    pub word_index: usize,
    pub words: Vec<String>,
    pub game_state: GameState,
    pub round_start_time: Option<DateTime<Utc>>,
    pub current_skips: u32,
    pub free_skips: u32,
    pub last_round_words: Vec<WordResult>,
}

impl SessionState {
    pub fn with_defaults(defaults: &SessionDefaults) -> Self {
        Self {
            team1_name: String::new(),
            team2_name: String::new(),
            team1_score: 0,
            team2_score: 0,
            team1_rounds_played: 0,
            team2_rounds_played: 0,
            round_duration: defaults.round_duration,
            difficulty: defaults.difficulty,
            word_index: 0,
            words: Vec::new(),
            game_state: GameState::Intro,
            round_start_time: None,
            current_skips: 0,
            free_skips: defaults.free_skips,
            last_round_words: Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Overlay a persisted blob onto `base`.
    ///
    /// Fields are merged one at a time: a key that is missing or holds the
    /// wrong type keeps the value from `base`. A blob that is not a JSON
    /// object leaves `base` untouched. Unknown keys (such as the legacy
    /// `isGameStarted` flag) are ignored.
    pub fn merge_json(base: Self, raw: &str) -> Self {
        let map = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!("persisted session is not an object ({}), using defaults", kind(&other));
                return base;
            }
            Err(e) => {
                warn!("persisted session is not valid JSON, using defaults: {}", e);
                return base;
            }
        };

        let mut s = base;
        merge_field(&map, "team1Name", &mut s.team1_name);
        merge_field(&map, "team2Name", &mut s.team2_name);
        merge_field(&map, "team1Score", &mut s.team1_score);
        merge_field(&map, "team2Score", &mut s.team2_score);
        merge_field(&map, "team1RoundsPlayed", &mut s.team1_rounds_played);
        merge_field(&map, "team2RoundsPlayed", &mut s.team2_rounds_played);
        merge_field(&map, "roundDuration", &mut s.round_duration);
        merge_field(&map, "difficulty", &mut s.difficulty);
        merge_field(&map, "wordIndex", &mut s.word_index);
        merge_field(&map, "words", &mut s.words);
        merge_field(&map, "gameState", &mut s.game_state);
        merge_field(&map, "roundStartTime", &mut s.round_start_time);
        merge_field(&map, "currentSkips", &mut s.current_skips);
        merge_field(&map, "freeSkips", &mut s.free_skips);
        merge_field(&map, "lastRoundWords", &mut s.last_round_words);
        s
    }
}

fn merge_field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = map.get(key) else {
        return;
    };
    match serde_json::from_value::<T>(value.clone()) {
        Ok(v) => *slot = v,
        Err(e) => warn!(field = key, "ignoring malformed session field: {}", e),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordStatus;
    use chrono::TimeZone;
    use serde_json::json;

    fn defaults() -> SessionState {
        SessionState::with_defaults(&SessionDefaults::default())
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut s = defaults();
        s.team1_name = "Alpha".into();
        s.round_start_time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        s.last_round_words
            .push(WordResult::new("kiwi", WordStatus::Skipped));

        let v: Value = serde_json::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(v["team1Name"], "Alpha");
        assert_eq!(v["team1RoundsPlayed"], 0);
        assert_eq!(v["roundDuration"], 60);
        assert_eq!(v["difficulty"], "Medium");
        assert_eq!(v["gameState"], "intro");
        assert_eq!(v["roundStartTime"], "2024-05-01T12:00:00Z");
        assert_eq!(
            v["lastRoundWords"],
            json!([{"word": "kiwi", "status": "skipped"}])
        );
    }

    #[test]
    fn full_record_roundtrips() {
        let mut s = defaults();
        s.team1_name = "Alpha".into();
        s.team2_name = "Beta".into();
        s.team1_score = -2;
        s.team2_score = 7;
        s.team1_rounds_played = 3;
        s.team2_rounds_played = 2;
        s.round_duration = 45;
        s.difficulty = Difficulty::Hard;
        s.word_index = 1;
        s.words = vec!["apple".into(), "pear".into()];
        s.game_state = GameState::Round;
        s.round_start_time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        s.current_skips = 1;
        s.free_skips = 2;
        s.last_round_words = vec![WordResult::new("apple", WordStatus::Correct)];

        let raw = s.to_json().unwrap();
        assert_eq!(SessionState::merge_json(defaults(), &raw), s);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let merged = SessionState::merge_json(defaults(), r#"{"team1Name":"A","team1Score":4}"#);
        assert_eq!(merged.team1_name, "A");
        assert_eq!(merged.team1_score, 4);
        assert_eq!(merged.team2_name, "");
        assert_eq!(merged.round_duration, 60);
        assert_eq!(merged.game_state, GameState::Intro);
    }

    #[test]
    fn mistyped_fields_are_skipped() {
        let raw = r#"{"team1Score":"lots","difficulty":"Impossible","team2Score":3,"roundStartTime":1714564800000}"#;
        let merged = SessionState::merge_json(defaults(), raw);
        assert_eq!(merged.team1_score, 0);
        assert_eq!(merged.difficulty, Difficulty::Medium);
        assert_eq!(merged.team2_score, 3);
        assert_eq!(merged.round_start_time, None);
    }

    #[test]
    fn legacy_record_with_is_game_started_loads() {
        let raw = json!({
            "team1Name": "Red",
            "team2Name": "Blue",
            "team1Score": 1,
            "team2Score": 2,
            "roundDuration": 30,
            "difficulty": "Easy",
            "isGameStarted": true
        })
        .to_string();
        let merged = SessionState::merge_json(defaults(), &raw);
        assert_eq!(merged.team1_name, "Red");
        assert_eq!(merged.team2_score, 2);
        assert_eq!(merged.round_duration, 30);
        assert_eq!(merged.difficulty, Difficulty::Easy);
        assert!(merged.words.is_empty());
    }

    #[test]
    fn garbage_and_non_objects_yield_base() {
        assert_eq!(SessionState::merge_json(defaults(), "{not json"), defaults());
        assert_eq!(SessionState::merge_json(defaults(), "[1,2]"), defaults());
        assert_eq!(SessionState::merge_json(defaults(), "null"), defaults());
    }
}
