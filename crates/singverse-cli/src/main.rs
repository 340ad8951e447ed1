//! SingTheVerse CLI - read the King James Bible and hear each verse sung
//!
//! This binary provides commands for fetching the verse data, reading and
//! searching it, and generating, describing, and rendering verse melodies.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use singverse_cli::commands::{self, MelodyArgs};
use singverse_cli::logging;

/// SingTheVerse - generative verse melodies
#[derive(Parser)]
#[command(name = "singverse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, normalize, and cache the verse data
    Fetch {
        /// Source URL (default: from config)
        #[arg(long)]
        url: Option<String>,

        /// Download even if the data is already cached
        #[arg(long)]
        refresh: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Convert a raw source file into normalized verse data
    Normalize {
        /// Raw scrollmapper JSON file
        #[arg(short, long)]
        input: String,

        /// Normalized output file
        #[arg(short, long)]
        output: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List books and their chapter counts
    Books {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show a chapter or verse ("John 3", "John 3:16", "/v/john/3/16")
    Read {
        /// Reference or reader route
        target: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Jump to a reference or search verse text
    Search {
        /// Reference or text to search for
        query: String,

        /// Maximum number of text matches
        #[arg(short, long, default_value_t = singverse_bible::DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the generated melody of a verse
    Melody {
        /// Reference or reader route
        target: String,

        #[command(flatten)]
        melody: MelodyArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the speech plan of a verse
    Speak {
        /// Reference or reader route
        target: String,

        #[command(flatten)]
        melody: MelodyArgs,

        /// Speech voice name
        #[arg(long)]
        voice: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render a verse melody to a WAV or MIDI file
    Render {
        /// Reference or reader route
        target: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Output format
        #[arg(long, default_value = "wav", value_parser = ["wav", "midi"])]
        format: String,

        /// Continue through the rest of the chapter
        #[arg(long)]
        auto_advance: bool,

        #[command(flatten)]
        melody: MelodyArgs,

        /// Skip the render cache
        #[arg(long)]
        no_cache: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show the last read position
    Resume {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Manage the offline cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Clear rendered melodies (and the verse data with --all)
    Clear {
        /// Also remove the cached verse data
        #[arg(long)]
        all: bool,
    },
    /// Show cache information
    Info {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Fetch { url, refresh, json } => {
            commands::fetch::run(url.as_deref(), refresh, json)
        }
        Commands::Normalize {
            input,
            output,
            json,
        } => commands::normalize::run(&input, &output, json),
        Commands::Books { json } => commands::books::run(json),
        Commands::Read { target, json } => commands::read::run(&target, json),
        Commands::Search { query, limit, json } => commands::search::run(&query, limit, json),
        Commands::Melody {
            target,
            melody,
            json,
        } => commands::melody::run(&target, &melody, json),
        Commands::Speak {
            target,
            melody,
            voice,
            json,
        } => commands::speak::run(&target, &melody, voice.as_deref(), json),
        Commands::Render {
            target,
            output,
            format,
            auto_advance,
            melody,
            no_cache,
            json,
        } => commands::render::run(
            &target,
            &output,
            &format,
            auto_advance,
            &melody,
            no_cache,
            json,
        ),
        Commands::Resume { json } => commands::resume::run(json),
        Commands::Cache { command } => match command {
            CacheCommands::Clear { all } => commands::cache::clear(all),
            CacheCommands::Info { json } => commands::cache::info(json),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { json } => commands::config::show(json),
            ConfigCommands::Init { force } => commands::config::init(force),
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use singverse_melody::{Key, Scale};

    #[test]
    fn test_cli_parses_read() {
        let cli = Cli::try_parse_from(["singverse", "read", "John 3:16"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Read { target, json } => {
                assert_eq!(target, "John 3:16");
                assert!(!json);
            }
            _ => panic!("expected read command"),
        }
    }

    #[test]
    fn test_cli_parses_search_with_default_limit() {
        let cli = Cli::try_parse_from(["singverse", "search", "living water", "--json"]).unwrap();
        match cli.command {
            Commands::Search { query, limit, json } => {
                assert_eq!(query, "living water");
                assert_eq!(limit, 25);
                assert!(json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_cli_parses_melody_overrides() {
        let cli = Cli::try_parse_from([
            "singverse",
            "-v",
            "melody",
            "Psalm 23:1",
            "--key",
            "Eb",
            "--scale",
            "pentatonic",
            "--tempo",
            "1.25",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Melody { target, melody, .. } => {
                assert_eq!(target, "Psalm 23:1");
                assert_eq!(melody.key, Some(Key::DSharp));
                assert_eq!(melody.scale, Some(Scale::Pentatonic));
                assert_eq!(melody.tempo, Some(1.25));
                assert_eq!(melody.low_octave, None);
            }
            _ => panic!("expected melody command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["singverse", "melody", "John 1:1", "--key", "H"]).is_err());
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "singverse",
            "render",
            "/v/john/11/35",
            "-o",
            "wept.mid",
            "--format",
            "midi",
            "--auto-advance",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                target,
                output,
                format,
                auto_advance,
                no_cache,
                ..
            } => {
                assert_eq!(target, "/v/john/11/35");
                assert_eq!(output, "wept.mid");
                assert_eq!(format, "midi");
                assert!(auto_advance);
                assert!(!no_cache);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_render_requires_output_and_known_format() {
        assert!(Cli::try_parse_from(["singverse", "render", "John 1:1"]).is_err());
        assert!(Cli::try_parse_from([
            "singverse", "render", "John 1:1", "-o", "x.mp3", "--format", "mp3"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parses_cache_and_config() {
        let cli = Cli::try_parse_from(["singverse", "cache", "clear", "--all"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache {
                command: CacheCommands::Clear { all: true }
            }
        ));

        let cli = Cli::try_parse_from(["singverse", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init { force: true }
            }
        ));
    }
}
