//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Scaffold fuzzing harnesses and launch throwaway fuzzing boxes
#[derive(Parser)]
#[command(
    name = "fuzzrig",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer yes to every prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Log diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scaffold the fuzzing layout in the current repository
    Init(commands::init::InitArgs),

    /// Add a fuzzing harness and register it in the workflow
    AddHarness(commands::add_harness::AddHarnessArgs),

    /// Create the settings file if it does not exist
    CreateConfig,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Provision a remote fuzzing box and clone a repository onto it
    LaunchDevEnv(commands::launch::LaunchArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Init(args) => commands::init::run(&app, &args),
            Command::AddHarness(args) => commands::add_harness::run(&app, &args),
            Command::CreateConfig => commands::config::create(&app),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::LaunchDevEnv(args) => commands::launch::run(&app, &args),
        }
    }
}
