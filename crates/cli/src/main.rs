//! The askgod client.

mod client;
mod commands;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use client::Client;

#[derive(Parser)]
#[command(name = "askgod")]
#[command(about = "CTF scoring system - client")]
#[command(disable_version_flag = true)]
struct Cli {
    /// URL of askgod server
    #[arg(short, long, env = "ASKGOD_SERVER", default_value = "https://askgod.nsec", global = true)]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the server status
    Status,

    /// Submit a flag
    Submit {
        flag: String,

        /// Note to attach to the submission
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the scoreboard
    Scoreboard {
        /// Keep following scoreboard updates
        #[arg(long)]
        live: bool,
    },

    /// Show the timeline
    Timeline,

    /// Show a team's submission history
    History {
        /// Team to inspect (admin only); defaults to your own team
        team_id: Option<i64>,
    },

    /// Show your team's details
    Details,

    /// Admin functions
    #[command(hide = true, subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Show the server config
    Config,

    /// Show live log messages from the server
    MonitorLog {
        /// One of critical, error, warn, info or debug
        #[arg(short, long, default_value = "info")]
        loglevel: String,
    },

    /// Show a live stream of submitted flags
    MonitorFlags,

    /// Add a new flag
    AddFlag {
        #[arg(value_name = "key=value")]
        fields: Vec<String>,
    },

    /// Delete a flag
    DeleteFlag { id: i64 },

    /// Import a list of flags
    ImportFlags {
        filename: PathBuf,

        /// Remove all existing flags first
        #[arg(long)]
        flush: bool,
    },

    /// List all the flags
    ListFlags,

    /// Update a flag
    UpdateFlag {
        id: i64,

        #[arg(value_name = "key=value")]
        fields: Vec<String>,
    },

    /// Add a new team
    AddTeam {
        #[arg(value_name = "key=value")]
        fields: Vec<String>,
    },

    /// Delete a team
    DeleteTeam { id: i64 },

    /// Import a list of teams
    ImportTeams {
        filename: PathBuf,

        /// Remove all existing teams first
        #[arg(long)]
        flush: bool,
    },

    /// List all the teams
    ListTeams,

    /// Update a team
    UpdateTeam {
        id: i64,

        #[arg(value_name = "key=value")]
        fields: Vec<String>,
    },

    /// Add a new score entry
    AddScore {
        #[arg(value_name = "key=value")]
        fields: Vec<String>,
    },

    /// Delete a score entry
    DeleteScore { id: i64 },

    /// List all the score entries
    ListScores,

    /// Update a score entry
    UpdateScore {
        id: i64,

        #[arg(value_name = "key=value")]
        fields: Vec<String>,
    },

    /// Show a team's submission history
    History { team_id: i64 },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new(cli.server)?;

    match cli.command {
        Command::Status => commands::status::run(&client).await,
        Command::Submit { flag, notes } => commands::submit::run(&client, flag, notes).await,
        Command::Scoreboard { live } => commands::scoreboard::run(&client, live).await,
        Command::Timeline => commands::timeline::run(&client).await,
        Command::History { team_id } => commands::history::run(&client, team_id).await,
        Command::Details => commands::details::run(&client).await,
        Command::Admin(admin) => match admin {
            AdminCommand::Config => commands::admin::config::run(&client).await,
            AdminCommand::MonitorLog { loglevel } => {
                commands::admin::monitor::logs(&client, &loglevel).await
            }
            AdminCommand::MonitorFlags => commands::admin::monitor::flags(&client).await,
            AdminCommand::AddFlag { fields } => commands::admin::flags::add(&client, fields).await,
            AdminCommand::DeleteFlag { id } => commands::admin::flags::delete(&client, id).await,
            AdminCommand::ImportFlags { filename, flush } => {
                commands::admin::flags::import(&client, &filename, flush).await
            }
            AdminCommand::ListFlags => commands::admin::flags::list(&client).await,
            AdminCommand::UpdateFlag { id, fields } => {
                commands::admin::flags::update(&client, id, fields).await
            }
            AdminCommand::AddTeam { fields } => commands::admin::teams::add(&client, fields).await,
            AdminCommand::DeleteTeam { id } => commands::admin::teams::delete(&client, id).await,
            AdminCommand::ImportTeams { filename, flush } => {
                commands::admin::teams::import(&client, &filename, flush).await
            }
            AdminCommand::ListTeams => commands::admin::teams::list(&client).await,
            AdminCommand::UpdateTeam { id, fields } => {
                commands::admin::teams::update(&client, id, fields).await
            }
            AdminCommand::AddScore { fields } => {
                commands::admin::scores::add(&client, fields).await
            }
            AdminCommand::DeleteScore { id } => commands::admin::scores::delete(&client, id).await,
            AdminCommand::ListScores => commands::admin::scores::list(&client).await,
            AdminCommand::UpdateScore { id, fields } => {
                commands::admin::scores::update(&client, id, fields).await
            }
            AdminCommand::History { team_id } => {
                commands::admin::scores::history(&client, team_id).await
            }
        },
    }
}
