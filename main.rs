use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use shnippet_core::config::{Config, OutputStructure};
use shnippet_core::error::{Error, Result};
use shnippet_core::extractor::{self, Extractor};
use shnippet_core::store::{self, SnippetStore};

/// Extract tagged code regions from tested sources into documentation snippets.
#[derive(Parser, Debug)]
#[clap(name = "shnippet", version)]
struct Opts {
    /// Path to the JSON config file
    #[clap(long, value_name = "FILE")]
    config: PathBuf,

    /// Override `outputDirectoryStructure`: flat, match, organized, or byLanguage
    #[clap(long, value_name = "STRUCTURE")]
    structure: Option<OutputStructure>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the root directory and write snippets (the default)
    Extract,
    /// Delete the snippet output directory
    Clear,
    /// Print one extracted snippet
    Show {
        name: String,
        /// Language name or directory, e.g. `python` or `py`
        #[clap(long, short)]
        language: String,
        #[clap(long)]
        line_numbers: bool,
    },
    /// Print the languages and imports offered for a snippet, as JSON
    Info { name: String },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            // `--help` and `--version` also arrive here, on stdout.
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    let stdout = io::stdout();
    if let Err(e) = run(opts, &mut stdout.lock()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(opts: Opts, out: &mut dyn Write) -> Result<()> {
    let mut config = Config::from_file(&opts.config)?;
    if let Some(structure) = opts.structure {
        config.output_directory_structure = structure;
    }

    match opts.command.unwrap_or(Command::Extract) {
        Command::Extract => {
            let summary = Extractor::new(config)?.extract()?;
            if summary.snippets_written == 0 {
                info!("no snippets found");
            }
        }
        Command::Clear => {
            extractor::clear(&config.snippet_output_directory)?;
        }
        Command::Show {
            name,
            language,
            line_numbers,
        } => {
            let mut snippets = SnippetStore::new(config);
            let content = snippets.get(&name, &language)?;
            writeln!(out, "{}", store::format_snippet(content, line_numbers))
                .map_err(|e| Error::io("<stdout>", e))?;
        }
        Command::Info { name } => {
            let info = SnippetStore::new(config).display_info(&name);
            let json = serde_json::to_string_pretty(&info)?;
            writeln!(out, "{}", json).map_err(|e| Error::io("<stdout>", e))?;
        }
    }
    Ok(())
}
