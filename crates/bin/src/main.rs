mod backend;
mod cli;
mod commands;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::run(&args).await,
        Some(Commands::Health(args)) => commands::health::run(&args).await,
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
