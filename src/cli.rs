use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::BetTag;

#[derive(Parser, Debug)]
#[command(name = "betboard", version, about = "Live block dashboard with a 16-option buy grid")]
pub struct Args {
    /// Path to the config file
    #[arg(short, long, env = "BETBOARD_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the latest blocks and print the dashboard
    Show {
        /// Expand the recent blocks history
        #[arg(long)]
        history: bool,
    },
    /// Request wallet accounts and remember the first one
    Connect,
    /// Forget the saved wallet address
    Disconnect,
    /// Buy one of the 16 grid options
    Bet {
        /// Grid option, 0-9 or a-f
        #[arg(short, long)]
        tag: BetTag,

        /// Amount in USDT, e.g. 12.5
        #[arg(short, long)]
        amount: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Show { history: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_show() {
        let args = Args::try_parse_from(["betboard"]).unwrap();
        assert_eq!(args.command(), Command::Show { history: false });
    }

    #[test]
    fn parses_bet() {
        let args = Args::try_parse_from(["betboard", "bet", "--tag", "c", "--amount", "5", "--yes"]).unwrap();
        assert_eq!(
            args.command(),
            Command::Bet {
                tag: BetTag::new(12).unwrap(),
                amount: "5".to_string(),
                yes: true,
            }
        );
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(Args::try_parse_from(["betboard", "bet", "--tag", "z", "--amount", "5"]).is_err());
    }

    #[test]
    fn show_with_history() {
        let args = Args::try_parse_from(["betboard", "show", "--history"]).unwrap();
        assert_eq!(args.command(), Command::Show { history: true });
    }
}
