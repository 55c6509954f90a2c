use charades::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, StorageBackend},
    logging, scoreboard, words, Difficulty, FileStore, GameSession, KeyValueStore,
    SessionDefaults, SqliteStore, WordStatus,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::{error::Error, path::PathBuf};
use tracing::{debug, warn};

/// two-team charades scorekeeper
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Keeps score for a two-team charades game. The game is saved after every command, so it picks up where it left off."
)]
pub struct Cli {
    /// directory holding the saved game
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,

    /// config file to read defaults from
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// where to save the game (overrides the config file)
    #[clap(long, value_enum, global = true)]
    backend: Option<StorageBackend>,

    /// log debug output to stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// name the teams and choose round settings
    Setup {
        team1: String,
        team2: String,

        /// round length in seconds
        #[clap(short = 'd', long)]
        duration: Option<u32>,

        /// word difficulty
        #[clap(short = 'l', long, value_enum)]
        difficulty: Option<Difficulty>,

        /// skips allowed per round
        #[clap(long)]
        free_skips: Option<u32>,
    },
    /// start a new game; both teams must be named
    Start,
    /// show the scoreboard
    Status,
    /// load the word pool from a text or JSON file
    Words {
        path: PathBuf,

        /// keep the file order instead of shuffling
        #[clap(long)]
        no_shuffle: bool,
    },
    /// enter the pre-round countdown
    Countdown,
    /// start the round timer for the team that is up next
    RoundStart,
    /// mark the current word as guessed
    Correct,
    /// skip the current word
    Skip {
        /// skip even when no free skips are left
        #[clap(long)]
        force: bool,
    },
    /// end the round and credit it to the team that performed
    RoundEnd,
    /// adjust a team's score by one
    Score {
        team: String,

        /// subtract a point instead of adding one
        #[clap(long)]
        down: bool,
    },
    /// count a played round for a team
    Rounds { team: String },
    /// clear the saved game
    Reset,
}

fn open_store(cli: &Cli, cfg: &Config) -> Result<Box<dyn KeyValueStore>, Box<dyn Error>> {
    let data_dir = cli.data_dir.as_deref();
    let store: Box<dyn KeyValueStore> = match cli.backend.unwrap_or(cfg.backend) {
        StorageBackend::File => Box::new(FileStore::with_dir(AppDirs::data_dir(data_dir))),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(AppDirs::db_path(data_dir))?),
    };
    Ok(store)
}

fn run<S: KeyValueStore>(session: &mut GameSession<S>, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Setup {
            team1,
            team2,
            duration,
            difficulty,
            free_skips,
        } => {
            session.set_team_names(team1, team2);
            let duration = duration.unwrap_or(session.round_duration());
            let difficulty = difficulty.unwrap_or(session.difficulty());
            session.set_settings(duration, difficulty);
            if let Some(n) = free_skips {
                session.set_free_skips(n);
            }
        }
        Command::Start => {
            if !session.start_game() {
                return Err("both teams need a name, run `charades setup` first".into());
            }
        }
        Command::Status => {}
        Command::Words { path, no_shuffle } => {
            let list = words::read_words(&path)?;
            debug!("loaded {} words from {}", list.len(), path.display());
            session.set_words(list);
            if !no_shuffle {
                session.shuffle_words(&mut rand::thread_rng());
            }
        }
        Command::Countdown => session.begin_countdown(),
        Command::RoundStart => session.start_round(Utc::now()),
        Command::Correct => {
            if session.resolve_word(WordStatus::Correct).is_none() {
                warn!("word pool is exhausted");
            }
        }
        Command::Skip { force } => {
            if !force && !session.has_free_skip() {
                return Err("no free skips left this round (use --force)".into());
            }
            if session.resolve_word(WordStatus::Skipped).is_none() {
                warn!("word pool is exhausted");
            }
        }
        Command::RoundEnd => {
            let team = session.finish_round();
            println!("round over for {team}");
        }
        Command::Score { team, down } => {
            if down {
                session.decrement_team_score(&team);
            } else {
                session.increment_team_score(&team);
            }
        }
        Command::Rounds { team } => session.increment_team_rounds_played(&team),
        Command::Reset => session.reset_game(),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let cfg = config_store.load();
    let store = open_store(&cli, &cfg)?;

    let mut session = GameSession::load(store, SessionDefaults::from(&cfg));
    run(&mut session, cli.command)?;

    print!("{}", scoreboard::render(&session, Utc::now()));
    Ok(())
}
