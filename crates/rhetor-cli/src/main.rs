//! Rhetor CLI
//!
//! Command-line access to a directory of RS3 discourse trees:
//! - Listing documents and showing their intra-sentential relations
//! - Corpus-wide relation names, counts and examples
//! - Relation counts and examples grouped by signal type/subtype
//! - Statistics over the relations declared in document headers
//! - Summarising a single `.rs3` file without loading a corpus
//!
//! Results are printed as pretty JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rhetor_corpus::{CorpusOptions, DocumentsRepository, ExampleFilter};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

mod logging;
mod parse;

#[derive(Parser)]
#[command(name = "rhetor")]
#[command(
    author,
    version,
    about = "Rhetor: intra-sentential relations in RS3 corpora"
)]
struct Cli {
    #[command(flatten)]
    corpus: CorpusArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus directory (defaults to $RHETOR_DOCUMENTS_DIR, then `documents`)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Maximum number of examples to print
    #[arg(long, global = true)]
    limit: Option<usize>,
}

impl CorpusArgs {
    fn options(&self) -> CorpusOptions {
        let mut options = CorpusOptions::from_env();
        if let Some(root) = &self.root {
            options = options.with_root(root);
        }
        if let Some(limit) = self.limit {
            options.example_limit = limit;
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the filenames of every loaded document
    Files,

    /// Show one document with its full text and selected relations
    Show {
        /// Document filename (basename, e.g. `GUM_news_iodine.rs3`)
        filename: String,
    },

    /// List the distinct relation names selected across the corpus
    Relations,

    /// Count selected relations by name
    Counts,

    /// Print examples of one relation
    Examples {
        /// Relation name (e.g. `elaboration-additional`)
        relation: String,
    },

    /// Count selected relations by signal type and subtype
    Grouped,

    /// Print examples filtered by relation and signal type/subtype
    GroupedExamples {
        /// Only relations with this name
        #[arg(long)]
        relation: Option<String>,
        /// Only relations with a signal of this type (`No Signal`, `No Type` allowed)
        #[arg(long)]
        signal_type: Option<String>,
        /// Only relations with a signal of this subtype (`No Signal`, `No Subtype` allowed)
        #[arg(long)]
        signal_subtype: Option<String>,
    },

    /// Summarise declared relations by name and by type
    Declared,

    /// Parse a single `.rs3` file and print a summary
    Parse {
        /// Input RS3 file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();
    let options = cli.corpus.options();
    let limit = options.example_limit;

    let load = || -> Result<DocumentsRepository> {
        debug!(root = %options.root.display(), "loading corpus");
        DocumentsRepository::load(&options)
            .with_context(|| format!("failed to load corpus at {}", options.root.display()))
    };

    match cli.command {
        Commands::Files => print_json(&load()?.filenames()),
        Commands::Show { filename } => print_json(load()?.document(&filename)?),
        Commands::Relations => print_json(&load()?.relation_names()),
        Commands::Counts => print_json(&load()?.relation_counts()),
        Commands::Examples { relation } => {
            print_json(&load()?.relation_examples(&relation, limit))
        }
        Commands::Grouped => print_json(&load()?.grouped_relations()),
        Commands::GroupedExamples {
            relation,
            signal_type,
            signal_subtype,
        } => {
            let filter = ExampleFilter {
                relation_name: relation,
                signal_type,
                signal_subtype,
            };
            print_json(&load()?.grouped_relation_examples(&filter, limit))
        }
        Commands::Declared => print_json(&load()?.declared_relations()),
        Commands::Parse { file } => print_json(&parse::cmd_parse(&file)?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
