use clap::{Parser, Subcommand};
use vanishvote_core::Theme;
use vanishvote_models::{ExpiresIn, ReactionKind};

#[derive(Parser, Debug)]
#[command(name = "vanishvote", version, about = "Anonymous polls that vanish")]
pub struct Args {
    /// Path to the config file
    #[arg(short, long, default_value = "vanishvote.toml", global = true)]
    pub config: String,

    /// API base URL (overrides config and VANISHVOTE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Colour theme: light or dark
    #[arg(long, global = true)]
    pub theme: Option<Theme>,

    /// Keep vote flags in memory only
    #[arg(long, global = true)]
    pub no_store: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new poll
    Create {
        #[arg(short, long)]
        question: String,

        /// Option text; repeat for each option (2 to 10)
        #[arg(short = 'o', long = "option", required = true)]
        options: Vec<String>,

        /// Hours until the poll expires: 1, 12, 24, 48 or 168
        #[arg(short, long, default_value = "24")]
        expires_in: ExpiresIn,

        /// Keep results hidden until the viewer votes or the poll expires
        #[arg(long)]
        hide_results: bool,

        /// List the poll publicly instead of link-only
        #[arg(long)]
        public: bool,
    },
    /// Show a poll
    Show {
        poll_id: String,

        /// Re-render on every refresh until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Vote for an option (numbered from 1)
    Vote { poll_id: String, option: usize },
    /// Add an anonymous comment
    Comment { poll_id: String, text: String },
    /// React to a poll
    React { poll_id: String, kind: ReactionKind },
    /// Print the share link for a poll
    Share { poll_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_collects_repeated_options() {
        let args = Args::try_parse_from([
            "vanishvote",
            "create",
            "-q",
            "Pizza or Tacos?",
            "-o",
            "Pizza",
            "--option",
            "Tacos",
            "--expires-in",
            "48h",
            "--hide-results",
        ])
        .expect("parse");
        match args.command {
            Command::Create {
                question,
                options,
                expires_in,
                hide_results,
                public,
            } => {
                assert_eq!(question, "Pizza or Tacos?");
                assert_eq!(options, vec!["Pizza", "Tacos"]);
                assert_eq!(expires_in, ExpiresIn::TwoDays);
                assert!(hide_results);
                assert!(!public);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn expiry_outside_the_allowed_set_is_rejected() {
        let err = Args::try_parse_from(["vanishvote", "create", "-q", "Q", "-o", "a", "-e", "5"]);
        assert!(err.is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = Args::try_parse_from(["vanishvote", "react", "abc", "trending", "--theme", "dark"])
            .expect("parse");
        assert_eq!(args.theme, Some(Theme::Dark));
        assert!(matches!(
            args.command,
            Command::React { kind: ReactionKind::Trending, .. }
        ));
    }
}
