use super::{load_profile, parse_sequence};
use crate::cli::SuggestArgs;
use crate::error::{CliError, Result};
use sequct::core::scoring::suggest::{Suggestions, suggest_mutations};
use sequct::core::sequence::variants::MutationRange;
use std::fmt::Write;
use tracing::info;

pub fn run(args: SuggestArgs) -> Result<()> {
    let sequence = parse_sequence(&args.sequence)?;
    let model = load_profile(&args.profile)?;
    let range = MutationRange::new(args.range_start, args.range_end);

    info!("Ranking single mutants of a {}-residue sequence.", sequence.len());
    let suggestions = suggest_mutations(&sequence, &model, args.top, range)
        .map_err(|e| CliError::Argument(e.to_string()))?;

    print!("{}", render(&suggestions));
    Ok(())
}

fn render(suggestions: &Suggestions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Wild-type fitness: {:.4}", suggestions.wild_type_fitness);

    let _ = writeln!(out, "Top mutants:");
    for (rank, s) in suggestions.mutants.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. {:<8} fitness {:.4} (gain {:+.4})",
            rank + 1,
            s.mutation.to_string(),
            s.fitness,
            s.gain
        );
    }

    let _ = writeln!(out, "Top positions:");
    if suggestions.positions.is_empty() {
        let _ = writeln!(out, "  (no position has a beneficial mutant)");
    }
    for (rank, p) in suggestions.positions.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. position {:<5} mean gain {:+.4} over {} mutant(s)",
            rank + 1,
            p.position,
            p.mean_gain,
            p.beneficial_mutants
        );
    }
    out
}
