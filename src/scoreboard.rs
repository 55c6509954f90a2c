use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::{GameState, WordStatus};
use crate::session::GameSession;
use crate::store::KeyValueStore;

fn phase_label(state: GameState) -> &'static str {
    match state {
        GameState::Intro => "intro",
        GameState::Countdown => "countdown",
        GameState::Round => "round",
        GameState::PostRound => "post-round",
    }
}

fn rounds_label(n: u32) -> String {
    if n == 1 {
        "1 round".to_string()
    } else {
        format!("{n} rounds")
    }
}

/// Plain-text summary of a session at a point in time
pub struct Scoreboard<'a, S: KeyValueStore> {
    session: &'a GameSession<S>,
    now: DateTime<Utc>,
}

impl<'a, S: KeyValueStore> Scoreboard<'a, S> {
    pub fn new(session: &'a GameSession<S>, now: DateTime<Utc>) -> Self {
        Self { session, now }
    }
}

impl<S: KeyValueStore> fmt::Display for Scoreboard<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;

        if session.team1_name().is_empty() && session.team2_name().is_empty() {
            writeln!(f, "no teams yet, run `charades setup <team1> <team2>`")?;
        } else {
            writeln!(
                f,
                "{} {} ({}) | {} {} ({})",
                session.team1_name(),
                session.team1_score(),
                rounds_label(session.team1_rounds_played()),
                session.team2_name(),
                session.team2_score(),
                rounds_label(session.team2_rounds_played()),
            )?;
        }

        write!(
            f,
            "phase: {}  difficulty: {}  duration: {}s",
            phase_label(session.game_state()),
            session.difficulty(),
            session.round_duration(),
        )?;
        if let Some(left) = session.seconds_remaining(self.now) {
            write!(f, "  time left: {left}s")?;
        }
        writeln!(f)?;

        if session.game_state() == GameState::Round {
            writeln!(f, "playing: {}", session.current_team())?;
        }
        if !session.next_team().is_empty() {
            writeln!(f, "up next: {}", session.next_team())?;
        }

        if !session.words().is_empty() {
            writeln!(
                f,
                "word: {} ({}/{})  skips: {}/{}",
                session.current_word().unwrap_or("(out of words)"),
                session.word_index().min(session.words().len()),
                session.words().len(),
                session.current_skips(),
                session.free_skips(),
            )?;
        }

        if !session.last_round_words().is_empty() {
            let log = session
                .last_round_words()
                .iter()
                .map(|r| match r.status {
                    WordStatus::Correct => format!("{} +", r.word),
                    WordStatus::Skipped => format!("{} -", r.word),
                })
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "last round: {log}")?;
        }

        Ok(())
    }
}

pub fn render<S: KeyValueStore>(session: &GameSession<S>, now: DateTime<Utc>) -> String {
    Scoreboard::new(session, now).to_string()
}
