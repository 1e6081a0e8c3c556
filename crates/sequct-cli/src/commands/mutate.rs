use super::{load_profile, parse_sequence};
use crate::cli::MutateArgs;
use crate::error::{CliError, Result};
use sequct::core::sequence::mutation::MutationSet;
use sequct::core::sequence::protein::ProteinSequence;
use tracing::info;

pub fn run(args: MutateArgs) -> Result<()> {
    let sequence = parse_sequence(&args.sequence)?;
    let mutated = apply(&sequence, &args.mutations)?;
    println!("{}", mutated);

    if let Some(profile) = &args.profile {
        let model = load_profile(profile)?;
        let before = model.score(&sequence);
        let after = model.score(&mutated);
        println!(
            "Fitness: {:.4} -> {:.4} ({:+.4})",
            before,
            after,
            after - before
        );
    }
    Ok(())
}

fn apply(sequence: &ProteinSequence, mutations: &str) -> Result<ProteinSequence> {
    let set = mutations
        .parse::<MutationSet>()
        .map_err(|e| CliError::Argument(e.to_string()))?;
    info!("Applying {} mutation(s): {}", set.len(), set);
    set.apply(sequence)
        .map_err(|e| CliError::Argument(e.to_string()))
}
