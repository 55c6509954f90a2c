use serde::{Deserialize, Serialize};

/// Word-selection tier chosen at setup
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Phase of play; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    #[default]
    Intro,
    Countdown,
    Round,
    PostRound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WordStatus {
    Correct,
    Skipped,
}

/// One entry of the just-finished round's audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordResult {
    pub word: String,
    pub status: WordStatus,
}

impl WordResult {
    pub fn new(word: impl Into<String>, status: WordStatus) -> Self {
        Self {
            word: word.into(),
            status,
        }
    }
}

/// Which of the two teams a name resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TeamSlot {
    One,
    Two,
}

impl TeamSlot {
    pub(crate) fn other(self) -> Self {
        match self {
            TeamSlot::One => TeamSlot::Two,
            TeamSlot::Two => TeamSlot::One,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_serializes_as_tier_name() {
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"Easy\"");
        assert_eq!(
            serde_json::from_str::<Difficulty>("\"Hard\"").unwrap(),
            Difficulty::Hard
        );
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }

    #[test]
    fn game_state_uses_camel_case_names() {
        assert_eq!(
            serde_json::to_string(&GameState::PostRound).unwrap(),
            "\"postRound\""
        );
        assert_eq!(
            serde_json::from_str::<GameState>("\"countdown\"").unwrap(),
            GameState::Countdown
        );
    }

    #[test]
    fn word_result_shape() {
        let r = WordResult::new("banana", WordStatus::Correct);
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            serde_json::json!({"word": "banana", "status": "correct"})
        );
        assert_eq!(WordStatus::Skipped.to_string(), "skipped");
    }

    #[test]
    fn team_slot_other() {
        assert_eq!(TeamSlot::One.other(), TeamSlot::Two);
        assert_eq!(TeamSlot::Two.other(), TeamSlot::One);
    }
}
