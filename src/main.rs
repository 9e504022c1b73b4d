use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use questlog::provider::Energy;

mod cli;

#[derive(Parser)]
#[command(name = "questlog")]
#[command(about = "Daily quests with XP, streaks, badges and a leaderboard")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.questlog/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default ~/.questlog/config.toml
    Init {
        /// Store the ledger database here instead of ~/.questlog/ledger.db
        #[arg(long)]
        database: Option<PathBuf>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create an account and sign in
    Signup {
        email: String,
        username: String,
        /// Profile picture (data URL or path)
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Sign in to an existing account
    Login { email: String },

    /// Sign out
    Logout,

    /// Show the signed-in user's progress
    Whoami,

    /// Record a completed quest
    Complete {
        /// Quest title
        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,
        /// Quest category (e.g. Fitness, Learning, Social)
        #[arg(long, required_unless_present = "from_file")]
        category: Option<String>,
        /// XP reward
        #[arg(long, required_unless_present = "from_file")]
        xp: Option<u32>,
        /// Read the quest from a saved provider response instead
        #[arg(long, conflicts_with_all = ["title", "category", "xp"])]
        from_file: Option<PathBuf>,
        /// Index of the quest in the file (1-based)
        #[arg(long, default_value_t = 1, requires = "from_file")]
        pick: usize,
    },

    /// List quests from a saved provider response
    Suggest {
        /// Provider response file (JSON)
        file: PathBuf,
        /// Goal categories to keep
        #[arg(long, value_delimiter = ',')]
        goals: Vec<String>,
        #[arg(long, value_enum, default_value = "medium")]
        energy: Energy,
        #[arg(long, default_value = "")]
        mood: String,
    },

    /// Change your username (once every 7 days)
    Rename { username: String },

    /// Turn notifications on or off
    Notifications {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Set or clear your profile picture
    Avatar {
        /// Omit to clear
        picture: Option<String>,
    },

    /// Show the leaderboard
    Leaderboard,

    /// Show badge progress
    Badges,

    /// Show recent completions
    History {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config;
    let open = || cli::open_manager(config_path.as_deref());

    match cli.command {
        Commands::Init { database, force } => {
            cli::init::init_command(config_path.clone(), database, force)
        }
        Commands::Suggest {
            file,
            goals,
            energy,
            mood,
        } => cli::quest::suggest_command(&file, goals, energy, mood),
        Commands::Signup {
            email,
            username,
            avatar,
        } => cli::account::signup_command(&open()?, &email, &username, avatar),
        Commands::Login { email } => cli::account::login_command(&open()?, &email),
        Commands::Logout => cli::account::logout_command(&open()?),
        Commands::Whoami => cli::account::whoami_command(&open()?),
        Commands::Complete {
            title,
            category,
            xp,
            from_file,
            pick,
        } => {
            let quest = match from_file {
                Some(path) => cli::quest::quest_from_file(&path, pick)?,
                None => cli::quest::quest_from_args(title, category, xp)?,
            };
            cli::quest::complete_command(&open()?, &quest)
        }
        Commands::Rename { username } => cli::account::rename_command(&open()?, &username),
        Commands::Notifications { enabled } => {
            cli::account::notifications_command(&open()?, enabled)
        }
        Commands::Avatar { picture } => cli::account::avatar_command(&open()?, picture),
        Commands::Leaderboard => cli::board::leaderboard_command(&open()?),
        Commands::Badges => cli::board::badges_command(&open()?),
        Commands::History { limit } => cli::board::history_command(&open()?, limit),
    }
}
