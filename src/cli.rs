use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar, in Chomsky normal form
    pub file: PathBuf,

    /// Sentences to parse (default: one per line from stdin)
    pub sentences: Vec<String>,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Generate random sentences instead of parsing
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Deepest derivation allowed when generating
    #[arg(long, value_name = "DEPTH", default_value_t = 32)]
    pub max_depth: usize,

    /// Print the grammar and exit
    #[arg(short = 'g', long)]
    pub print_grammar: bool,

    /// Print trees one node per line
    #[arg(short, long)]
    pub pretty: bool,

    /// Print every non-empty chart cell
    #[arg(short, long)]
    pub chart: bool
}
