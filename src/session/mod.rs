//! The game session: all persistent game state plus the operations that
//! mutate it.
//!
//! Every public mutator changes the in-memory state first and then writes the
//! whole record to the store. Store failures are logged and swallowed so the
//! in-memory state stays authoritative.

mod state;

pub use state::SessionState;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::model::{Difficulty, GameState, TeamSlot, WordResult, WordStatus};
use crate::store::KeyValueStore;

/// Key the session blob is stored under
pub const SESSION_KEY: &str = "charades_game_state";

/// Values a fresh or reset session starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDefaults {
    pub round_duration: u32,
    pub difficulty: Difficulty,
    pub free_skips: u32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            round_duration: 60,
            difficulty: Difficulty::Medium,
            free_skips: 3,
        }
    }
}

#[derive(Debug)]
pub struct GameSession<S: KeyValueStore> {
    state: SessionState,
    defaults: SessionDefaults,
    store: S,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Open the session held in `store`, or start from defaults if none is stored
    pub fn load(store: S, defaults: SessionDefaults) -> Self {
        let base = SessionState::with_defaults(&defaults);
        let state = match store.load(SESSION_KEY) {
            Ok(Some(raw)) => {
                debug!("rehydrating session from store");
                SessionState::merge_json(base, &raw)
            }
            Ok(None) => base,
            Err(e) => {
                warn!("failed to read persisted session, starting fresh: {}", e);
                base
            }
        };
        Self {
            state,
            defaults,
            store,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn team1_name(&self) -> &str {
        &self.state.team1_name
    }

    pub fn team2_name(&self) -> &str {
        &self.state.team2_name
    }

    pub fn team1_score(&self) -> i64 {
        self.state.team1_score
    }

    pub fn team2_score(&self) -> i64 {
        self.state.team2_score
    }

    pub fn team1_rounds_played(&self) -> u32 {
        self.state.team1_rounds_played
    }

    pub fn team2_rounds_played(&self) -> u32 {
        self.state.team2_rounds_played
    }

    pub fn round_duration(&self) -> u32 {
        self.state.round_duration
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn word_index(&self) -> usize {
        self.state.word_index
    }

    pub fn words(&self) -> &[String] {
        &self.state.words
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn round_start_time(&self) -> Option<DateTime<Utc>> {
        self.state.round_start_time
    }

    pub fn current_skips(&self) -> u32 {
        self.state.current_skips
    }

    pub fn free_skips(&self) -> u32 {
        self.state.free_skips
    }

    pub fn last_round_words(&self) -> &[WordResult] {
        &self.state.last_round_words
    }

    /// Names are stored verbatim, without trimming
    pub fn set_team_names(&mut self, t1: impl Into<String>, t2: impl Into<String>) {
        self.state.team1_name = t1.into();
        self.state.team2_name = t2.into();
        self.persist();
    }

    /// Accepted as given; the caller validates
    pub fn set_settings(&mut self, duration: u32, level: Difficulty) {
        self.state.round_duration = duration;
        self.state.difficulty = level;
        self.persist();
    }

    pub fn set_free_skips(&mut self, free_skips: u32) {
        self.state.free_skips = free_skips;
        self.persist();
    }

    /// Enter the intro phase with an empty word pool.
    ///
    /// Returns `false` and changes nothing unless both team names are non-empty.
    pub fn start_game(&mut self) -> bool {
        if self.state.team1_name.is_empty() || self.state.team2_name.is_empty() {
            debug!("start_game ignored: both team names are required");
            return false;
        }
        self.state.game_state = GameState::Intro;
        self.state.words.clear();
        self.state.word_index = 0;
        self.state.round_start_time = None;
        info!(
            team1 = %self.state.team1_name,
            team2 = %self.state.team2_name,
            "game started"
        );
        self.persist();
        true
    }

    /// Back to defaults, and the persisted record is deleted rather than overwritten
    pub fn reset_game(&mut self) {
        self.state = SessionState::with_defaults(&self.defaults);
        if let Err(e) = self.store.remove(SESSION_KEY) {
            warn!("failed to remove persisted session: {}", e);
        }
        info!("game reset");
    }

    fn next_slot(&self) -> TeamSlot {
        if self.state.team1_rounds_played > self.state.team2_rounds_played {
            TeamSlot::Two
        } else {
            TeamSlot::One
        }
    }

    fn name_of(&self, slot: TeamSlot) -> &str {
        match slot {
            TeamSlot::One => &self.state.team1_name,
            TeamSlot::Two => &self.state.team2_name,
        }
    }

    /// The team with fewer rounds played; ties go to team 1
    pub fn next_team(&self) -> &str {
        self.name_of(self.next_slot())
    }

    /// Whichever team is not `next_team`
    pub fn current_team(&self) -> &str {
        self.name_of(self.next_slot().other())
    }

    /// Team 1 is checked first, so identical names always resolve to team 1
    fn slot_for(&self, team: &str) -> Option<TeamSlot> {
        if team == self.state.team1_name {
            Some(TeamSlot::One)
        } else if team == self.state.team2_name {
            Some(TeamSlot::Two)
        } else {
            debug!("no team named {:?}, ignoring", team);
            None
        }
    }

    fn score_mut(&mut self, slot: TeamSlot) -> &mut i64 {
        match slot {
            TeamSlot::One => &mut self.state.team1_score,
            TeamSlot::Two => &mut self.state.team2_score,
        }
    }

    pub fn increment_team_score(&mut self, team: &str) {
        if let Some(slot) = self.slot_for(team) {
            *self.score_mut(slot) += 1;
            self.persist();
        }
    }

    /// May take the score below zero
    pub fn decrement_team_score(&mut self, team: &str) {
        if let Some(slot) = self.slot_for(team) {
            *self.score_mut(slot) -= 1;
            self.persist();
        }
    }

    pub fn increment_team_rounds_played(&mut self, team: &str) {
        if let Some(slot) = self.slot_for(team) {
            self.bump_rounds(slot);
            self.persist();
        }
    }

    fn bump_rounds(&mut self, slot: TeamSlot) {
        match slot {
            TeamSlot::One => self.state.team1_rounds_played += 1,
            TeamSlot::Two => self.state.team2_rounds_played += 1,
        }
    }

    pub fn add_word_result(&mut self, word: impl Into<String>, status: WordStatus) {
        self.state.last_round_words.push(WordResult::new(word, status));
        self.persist();
    }

    /// Clears the round log and skip count; scores and rounds are untouched
    pub fn reset_round_stats(&mut self) {
        self.state.last_round_words.clear();
        self.state.current_skips = 0;
        self.persist();
    }

    pub fn begin_countdown(&mut self) {
        self.state.game_state = GameState::Countdown;
        self.state.round_start_time = None;
        self.persist();
    }

    /// Enter the round phase with the timer anchored at `now`.
    ///
    /// The team named by `next_team` performs: its rounds-played count goes
    /// up here, so for the rest of the round and afterwards it is
    /// `current_team`.
    pub fn start_round(&mut self, now: DateTime<Utc>) {
        let slot = self.next_slot();
        self.bump_rounds(slot);
        self.state.game_state = GameState::Round;
        self.state.round_start_time = Some(now);
        self.state.last_round_words.clear();
        self.state.current_skips = 0;
        debug!(team = %self.name_of(slot), "round started");
        self.persist();
    }

    /// Close the round; returns the name of the team that performed
    pub fn finish_round(&mut self) -> String {
        self.state.game_state = GameState::PostRound;
        self.state.round_start_time = None;
        let performer = self.current_team().to_string();
        info!(
            team = %performer,
            correct = self.count_results(WordStatus::Correct),
            skipped = self.count_results(WordStatus::Skipped),
            "round finished"
        );
        self.persist();
        performer
    }

    fn count_results(&self, status: WordStatus) -> usize {
        self.state
            .last_round_words
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    /// Whole seconds left on the round timer, or `None` outside a round
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> Option<u32> {
        if self.state.game_state != GameState::Round {
            return None;
        }
        let started = self.state.round_start_time?;
        let elapsed = (now - started).num_seconds().max(0);
        let left = i64::from(self.state.round_duration) - elapsed;
        Some(left.clamp(0, i64::from(u32::MAX)) as u32)
    }

    pub fn has_free_skip(&self) -> bool {
        self.state.current_skips < self.state.free_skips
    }

    pub fn record_skip(&mut self) {
        self.state.current_skips += 1;
        self.persist();
    }

    /// Replace the word pool and rewind the cursor
    pub fn set_words(&mut self, words: Vec<String>) {
        self.state.words = words;
        self.state.word_index = 0;
        self.persist();
    }

    pub fn shuffle_words<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state.words.shuffle(rng);
        self.state.word_index = 0;
        self.persist();
    }

    /// `None` once the cursor has run past the pool
    pub fn current_word(&self) -> Option<&str> {
        self.state
            .words
            .get(self.state.word_index)
            .map(String::as_str)
    }

    pub fn advance_word(&mut self) -> Option<&str> {
        if self.state.word_index < self.state.words.len() {
            self.state.word_index += 1;
            self.persist();
        }
        self.current_word()
    }

    /// Log the current word with `status` and move to the next one.
    ///
    /// A correct word scores a point for `current_team`; a skipped word
    /// uses up a skip. Returns the resolved word, or `None` if the pool is
    /// exhausted.
    pub fn resolve_word(&mut self, status: WordStatus) -> Option<String> {
        let word = self.current_word()?.to_string();
        self.state
            .last_round_words
            .push(WordResult::new(word.clone(), status));
        match status {
            WordStatus::Correct => {
                let slot = self.next_slot().other();
                *self.score_mut(slot) += 1;
            }
            WordStatus::Skipped => self.state.current_skips += 1,
        }
        self.state.word_index += 1;
        self.persist();
        Some(word)
    }

    fn persist(&mut self) {
        let raw = match self.state.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to serialize session: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.save(SESSION_KEY, &raw) {
            warn!("failed to persist session: {}", e);
        }
    }
}
