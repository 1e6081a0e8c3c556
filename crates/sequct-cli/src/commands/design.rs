use super::{load_profile, parse_sequence};
use crate::cli::DesignArgs;
use crate::config::PartialDesignConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use sequct::engine::progress::ProgressReporter;
use sequct::workflows::{self, design::DesignResult};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct TrajectoryRecord<'a> {
    round: usize,
    #[serde(rename = "move")]
    mv: String,
    sequence: &'a str,
    mutations: String,
    fitness: f64,
    visits: u64,
    tree_size: usize,
    max_depth: usize,
}

pub fn run(args: DesignArgs, quiet: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialDesignConfig::from_file(path)?,
        None => PartialDesignConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let sequence = parse_sequence(&args.sequence)?;
    let model = load_profile(&args.profile)?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Designing from {} ({} round(s), {} iteration(s) each)...",
        sequence, config.rounds, config.search.iteration_budget
    );
    info!("Invoking the core design workflow...");
    let result = workflows::design::run(&sequence, &model, &config, &reporter)?;

    print_summary(&result);

    if let Some(output) = &args.output {
        write_trajectory(output, &result)?;
        println!("Trajectory written to: {}", output.display());
    }

    Ok(())
}

fn print_summary(result: &DesignResult) {
    println!("Initial: {} (fitness {:.4})", result.initial, result.initial_fitness);
    for round in &result.rounds {
        println!(
            "  Round {:>3}: {:<8} -> {} (fitness {:.4}, {} visit(s), {} node(s))",
            round.round,
            round.chosen_move.to_string(),
            round.sequence,
            round.fitness,
            round.visits,
            round.tree_size
        );
    }
    println!(
        "✓ Final: {} (fitness {:.4})",
        result.final_sequence(),
        result.final_fitness()
    );
    let mutations = result.final_mutations();
    if !mutations.is_empty() {
        println!("  Mutations: {}", mutations);
    }
}

/// Writes the seed and every round as CSV rows; the seed row has round 0 and no move.
/// `mutations` holds the substitution chain applied to the seed so far.
pub(crate) fn write_trajectory(path: &Path, result: &DesignResult) -> Result<()> {
    let writing_error = |e: csv::Error| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(writing_error)?;

    writer
        .serialize(TrajectoryRecord {
            round: 0,
            mv: String::new(),
            sequence: result.initial.as_str(),
            mutations: String::new(),
            fitness: result.initial_fitness,
            visits: 0,
            tree_size: 0,
            max_depth: 0,
        })
        .map_err(writing_error)?;

    for round in &result.rounds {
        writer
            .serialize(TrajectoryRecord {
                round: round.round,
                mv: round.chosen_move.to_string(),
                sequence: round.sequence.as_str(),
                mutations: round.mutations.to_string(),
                fitness: round.fitness,
                visits: round.visits,
                tree_size: round.tree_size,
                max_depth: round.max_depth,
            })
            .map_err(writing_error)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use sequct::core::sequence::protein::ProteinSequence;
    use sequct::core::sequence::mutation::{Mutation, MutationSet};
    use sequct::engine::profile_oracle::DesignMove;
    use sequct::workflows::design::RoundResult;
    use std::fs;

    fn profile_csv() -> String {
        let mut csv = String::from("position,residue,score\n");
        for position in 1..=3 {
            for residue in "ACDEFGHIKLMNPQRSTVWY".chars() {
                let score = if residue == 'W' { 1.0 } else { -10.0 };
                csv.push_str(&format!("{},{},{}\n", position, residue, score));
            }
        }
        csv
    }

    #[test]
    fn trajectory_lists_seed_then_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        let result = DesignResult {
            initial: ProteinSequence::parse("MK").unwrap(),
            initial_fitness: 0.5,
            rounds: vec![RoundResult {
                round: 1,
                chosen_move: DesignMove::Extend("W".to_string()),
                sequence: ProteinSequence::parse("MKW").unwrap(),
                mutations: MutationSet::default(),
                fitness: 0.75,
                visits: 12,
                tree_size: 81,
                max_depth: 3,
            }],
            cache_entries: 81,
            cache_hit_rate: 0.2,
        };

        write_trajectory(&path, &result).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "round,move,sequence,mutations,fitness,visits,tree_size,max_depth"
        );
        assert_eq!(lines[1], "0,,MK,,0.5,0,0,0");
        assert_eq!(lines[2], "1,+W,MKW,,0.75,12,81,3");
    }

    #[test]
    fn trajectory_records_the_cumulative_mutation_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        let first = Mutation::new('K', 2, 'W');
        let second = Mutation::new('T', 3, 'A');
        let round = |n, mv: Mutation, seq: &str, mutations: MutationSet| RoundResult {
            round: n,
            chosen_move: DesignMove::Substitute(mv),
            sequence: ProteinSequence::parse(seq).unwrap(),
            mutations,
            fitness: 0.0,
            visits: 1,
            tree_size: 39,
            max_depth: 1,
        };
        let chain = MutationSet::from(first);
        let result = DesignResult {
            initial: ProteinSequence::parse("MKT").unwrap(),
            initial_fitness: -1.0,
            rounds: vec![
                round(1, first, "MWT", chain.clone()),
                round(2, second, "MWA", chain.then(second)),
            ],
            cache_entries: 78,
            cache_hit_rate: 0.0,
        };

        write_trajectory(&path, &result).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[2], "1,K2W,MWT,K2W,0.0,1,39,1");
        assert_eq!(lines[3], "2,T3A,MWA,K2W:T3A,0.0,1,39,1");
    }

    #[test]
    fn design_command_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("profile.csv");
        let output = dir.path().join("out.csv");
        fs::write(&profile, profile_csv()).unwrap();

        let cli = Cli::parse_from([
            "sequct",
            "design",
            "-s",
            "W",
            "-p",
            profile.to_str().unwrap(),
            "-n",
            "25",
            "-r",
            "2",
            "-o",
            output.to_str().unwrap(),
        ]);
        let Commands::Design(args) = cli.command else {
            panic!("Expected 'design' subcommand");
        };

        run(args, true).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let last = content.lines().last().unwrap();
        assert!(last.starts_with("2,+W,WWW,,"));
    }

    #[test]
    fn invalid_seed_sequence_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("profile.csv");
        fs::write(&profile, profile_csv()).unwrap();

        let cli = Cli::parse_from([
            "sequct",
            "design",
            "-s",
            "MK1",
            "-p",
            profile.to_str().unwrap(),
        ]);
        let Commands::Design(args) = cli.command else {
            panic!("Expected 'design' subcommand");
        };
        assert!(matches!(run(args, true), Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_profile_is_a_parsing_error() {
        let cli = Cli::parse_from([
            "sequct",
            "design",
            "-s",
            "MK",
            "-p",
            "/nonexistent/profile.csv",
        ]);
        let Commands::Design(args) = cli.command else {
            panic!("Expected 'design' subcommand");
        };
        assert!(matches!(run(args, true), Err(CliError::FileParsing { .. })));
    }
}
