use clap::{Parser, Subcommand};

/// `Affilink` - Telegram bot that rewrites Amazon product links with your
/// affiliate tag.
#[derive(Parser, Debug)]
#[command(name = "affilink")]
#[command(version)]
#[command(about = "Rewrites Amazon product links with your affiliate tag.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the bot and listen for messages
    Start,

    /// Check configured channels' health
    Doctor,

    /// Print the config file location and readiness
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start() {
        let cli = Cli::try_parse_from(["affilink", "start"]).unwrap();
        assert!(matches!(cli.command, Commands::Start));
    }

    #[test]
    fn parses_doctor() {
        let cli = Cli::try_parse_from(["affilink", "doctor"]).unwrap();
        assert!(matches!(cli.command, Commands::Doctor));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["affilink", "frobnicate"]).is_err());
    }
}
