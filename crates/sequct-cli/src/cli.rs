use crate::config::{FilterKind, MoveKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "SeqUCT CLI - Protein sequence design by UCT tree search over a fitness profile.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Design a sequence by running one or more UCT searches from a seed sequence.
    Design(DesignArgs),
    /// Rank the single point mutants of a sequence by predicted fitness gain.
    Suggest(SuggestArgs),
    /// Apply a colon-separated list of point mutations (e.g. 'A12C:D15E') to a sequence.
    Mutate(MutateArgs),
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    // --- Core Arguments ---
    /// Seed protein sequence in one-letter code.
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Fitness profile CSV with a `position,residue,score` header.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub profile: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the per-round design trajectory to a CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Search Overrides ---
    /// Number of search iterations per round.
    #[arg(short = 'n', long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Weight of the exploration term in the selection score.
    #[arg(long, value_name = "FLOAT")]
    pub exploration_weight: Option<f64>,

    // --- Design Overrides ---
    /// Number of successive design rounds.
    #[arg(short, long, value_name = "INT")]
    pub rounds: Option<usize>,

    /// Propose extensions by this many residues (at most 4) at each step.
    #[arg(long, value_name = "INT", conflicts_with = "substitute")]
    pub extend: Option<usize>,

    /// Propose single point substitutions instead of extensions.
    #[arg(long)]
    pub substitute: bool,

    /// First 1-based position eligible for substitution.
    #[arg(long, value_name = "INT")]
    pub range_start: Option<usize>,

    /// Last 1-based position eligible for substitution.
    #[arg(long, value_name = "INT")]
    pub range_end: Option<usize>,

    /// How candidate moves are narrowed before entering the tree.
    #[arg(long, value_enum, value_name = "KIND")]
    pub candidate_filter: Option<FilterKind>,

    /// Number of candidates kept by the `top`, `sample` and `stratified` filters.
    #[arg(short = 'm', long, value_name = "INT")]
    pub max_candidates: Option<usize>,

    /// Softmax temperature used to turn candidate fitness into priors.
    #[arg(long, value_name = "FLOAT")]
    pub prior_temperature: Option<f64>,

    /// Seed for candidate sampling.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.iterations=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

impl DesignArgs {
    pub fn move_kind(&self) -> Option<MoveKind> {
        if self.substitute {
            Some(MoveKind::Substitute)
        } else if self.extend.is_some() {
            Some(MoveKind::Extend)
        } else {
            None
        }
    }
}

/// Arguments for the `suggest` subcommand.
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Wild-type protein sequence in one-letter code.
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Fitness profile CSV with a `position,residue,score` header.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub profile: PathBuf,

    /// Number of mutants and positions to report.
    #[arg(short = 'k', long, default_value_t = 10, value_name = "INT")]
    pub top: usize,

    /// First 1-based position to consider.
    #[arg(long, value_name = "INT")]
    pub range_start: Option<usize>,

    /// Last 1-based position to consider.
    #[arg(long, value_name = "INT")]
    pub range_end: Option<usize>,
}

/// Arguments for the `mutate` subcommand.
#[derive(Args, Debug)]
pub struct MutateArgs {
    /// Wild-type protein sequence in one-letter code.
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Mutations in `A12C` notation, colon-separated.
    #[arg(short, long, required = true, value_name = "MUTATIONS")]
    pub mutations: String,

    /// Also report the fitness of both sequences under this profile.
    #[arg(short, long, value_name = "PATH")]
    pub profile: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_arguments_parse_with_global_flags() {
        let cli = Cli::parse_from([
            "sequct", "-vv", "design", "-s", "MKT", "-p", "profile.csv", "-n", "50", "--substitute",
            "--range-start", "2", "-S", "design.rounds=3",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Design(args) = cli.command else {
            panic!("Expected 'design' subcommand");
        };
        assert_eq!(args.sequence, "MKT");
        assert_eq!(args.iterations, Some(50));
        assert_eq!(args.move_kind(), Some(MoveKind::Substitute));
        assert_eq!(args.range_start, Some(2));
        assert_eq!(args.set_values, vec!["design.rounds=3"]);
    }

    #[test]
    fn extend_and_substitute_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "sequct", "design", "-s", "MK", "-p", "p.csv", "--extend", "2", "--substitute",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result =
            Cli::try_parse_from(["sequct", "-q", "-v", "suggest", "-s", "MK", "-p", "p.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn suggest_defaults_to_ten_results() {
        let cli = Cli::parse_from(["sequct", "suggest", "-s", "MK", "-p", "p.csv"]);
        let Commands::Suggest(args) = cli.command else {
            panic!("Expected 'suggest' subcommand");
        };
        assert_eq!(args.top, 10);
    }
}
