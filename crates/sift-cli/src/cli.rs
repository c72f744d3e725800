//! Command line definition.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sift", version, about = "Parse and render metadata filter expressions")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a filter expression and print its AST as JSON
    Parse {
        /// Filter text, e.g. "genre == 'drama' && year >= 2020"
        expression: String,
    },

    /// Render a filter expression into a target dialect
    Render {
        /// Filter text, e.g. "genre == 'drama' && year >= 2020"
        expression: String,

        /// Target dialect name (see `sift dialects`)
        #[arg(short, long)]
        dialect: String,

        /// Allow-listed field as NAME:KIND (kinds: text, int, decimal,
        /// bool, date); repeatable. Required for azure, optional
        /// elsewhere.
        #[arg(long = "field", value_name = "NAME:KIND")]
        fields: Vec<String>,
    },

    /// Evaluate a filter expression against a metadata JSON object
    Eval {
        /// Filter text, e.g. "country == 'BG'"
        expression: String,

        /// Metadata object, e.g. '{"country": "BG", "year": 2020}'
        #[arg(short, long)]
        metadata: String,
    },

    /// List available dialects
    Dialects,
}
