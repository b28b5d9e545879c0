pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tintuc")]
#[command(about = "A terminal reader for the tintuc news portal", long_about = None)]
pub struct Cli {
    /// Summary endpoint to use instead of the configured one
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the home feed
    Home,
    /// Print an article's rendered blocks
    Article {
        /// Article id
        id: String,
    },
    /// Parse an HTML fragment and print its blocks in marker encoding
    Blocks {
        /// HTML file, or "-" for stdin
        path: std::path::PathBuf,
        /// Decode each marker line again and print the rendered block
        #[arg(long)]
        render: bool,
    },
    /// Launch the TUI (default)
    Tui,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_is_default() {
        let cli = Cli::try_parse_from(["tintuc"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.url.is_none());
    }

    #[test]
    fn test_global_url_after_subcommand() {
        let cli = Cli::try_parse_from(["tintuc", "article", "42", "--url", "http://x/summary"])
            .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://x/summary"));
        assert!(matches!(cli.command, Some(Commands::Article { id }) if id == "42"));
    }

    #[test]
    fn test_blocks_render_flag() {
        let cli = Cli::try_parse_from(["tintuc", "blocks", "-", "--render"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Blocks { render: true, .. })));
    }
}
