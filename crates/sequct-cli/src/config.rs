use crate::cli::DesignArgs;
use crate::error::{CliError, Result};
use clap::ValueEnum;
use sequct::core::scoring::filter::CandidateFilter;
use sequct::core::sequence::variants::MutationRange;
use sequct::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_ITERATIONS: usize = 100;
const DEFAULT_ROUNDS: usize = 1;
const DEFAULT_EXTENSION_LENGTH: usize = 1;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MoveKind {
    Extend,
    Substitute,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    All,
    Top,
    Sample,
    Stratified,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    iterations: Option<usize>,
    #[serde(rename = "exploration-weight")]
    exploration_weight: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRoundsConfig {
    rounds: Option<usize>,
    #[serde(rename = "move-set")]
    move_set: Option<MoveKind>,
    #[serde(rename = "extension-length")]
    extension_length: Option<usize>,
    #[serde(rename = "range-start")]
    range_start: Option<usize>,
    #[serde(rename = "range-end")]
    range_end: Option<usize>,
    #[serde(rename = "prior-temperature")]
    prior_temperature: Option<f64>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCandidatesConfig {
    filter: Option<FilterKind>,
    #[serde(rename = "max-candidates")]
    max_candidates: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDesignConfig {
    search: Option<PartialSearchConfig>,
    design: Option<PartialRoundsConfig>,
    candidates: Option<PartialCandidatesConfig>,
}

impl PartialDesignConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves every setting with precedence: command line, then `--set`, then
    /// the file, then built-in defaults.
    pub fn merge_with_cli(mut self, args: &DesignArgs) -> Result<core_config::DesignConfig> {
        self.apply_set_values(&args.set_values)?;

        let search = self.search.take().unwrap_or_default();
        let design = self.design.take().unwrap_or_default();
        let candidates = self.candidates.take().unwrap_or_default();

        let range = MutationRange::new(
            args.range_start.or(design.range_start),
            args.range_end.or(design.range_end),
        );
        let move_set = match args.move_kind().or(design.move_set) {
            Some(MoveKind::Substitute) => core_config::MoveSet::Substitute { range },
            Some(MoveKind::Extend) | None => core_config::MoveSet::Extend {
                length: args
                    .extend
                    .or(design.extension_length)
                    .unwrap_or(DEFAULT_EXTENSION_LENGTH),
            },
        };

        let candidate_filter = Self::merge_candidate_filter(
            args.candidate_filter.or(candidates.filter),
            args.max_candidates.or(candidates.max_candidates),
        )?;

        let mut builder = core_config::DesignConfigBuilder::new()
            .iteration_budget(
                args.iterations
                    .or(search.iterations)
                    .unwrap_or(DEFAULT_ITERATIONS),
            )
            .rounds(args.rounds.or(design.rounds).unwrap_or(DEFAULT_ROUNDS))
            .move_set(move_set)
            .candidate_filter(candidate_filter);

        if let Some(weight) = args.exploration_weight.or(search.exploration_weight) {
            builder = builder.exploration_weight(weight);
        }
        if let Some(temperature) = args.prior_temperature.or(design.prior_temperature) {
            builder = builder.prior_temperature(temperature);
        }
        if let Some(seed) = args.seed.or(design.seed) {
            builder = builder.seed(seed);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_candidate_filter(
        kind: Option<FilterKind>,
        limit: Option<usize>,
    ) -> Result<CandidateFilter> {
        let require_limit = |name: &str| {
            limit.ok_or_else(|| {
                CliError::Config(format!(
                    "The '{}' candidate filter requires `max-candidates`.",
                    name
                ))
            })
        };
        Ok(match (kind, limit) {
            (Some(FilterKind::All), _) | (None, None) => CandidateFilter::All,
            (Some(FilterKind::Top), _) => CandidateFilter::Top {
                limit: require_limit("top")?,
            },
            (Some(FilterKind::Sample), _) => CandidateFilter::Sample {
                limit: require_limit("sample")?,
            },
            (Some(FilterKind::Stratified), _) => CandidateFilter::Stratified {
                limit: require_limit("stratified")?,
            },
            (None, Some(limit)) => CandidateFilter::Top { limit },
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "search.iterations" => {
                    self.search.get_or_insert_with(Default::default).iterations =
                        Some(parse_value(key, value_str)?);
                }
                "search.exploration-weight" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .exploration_weight = Some(parse_value(key, value_str)?);
                }
                "design.rounds" => {
                    self.design.get_or_insert_with(Default::default).rounds =
                        Some(parse_value(key, value_str)?);
                }
                "design.move-set" => {
                    self.design.get_or_insert_with(Default::default).move_set =
                        Some(parse_enum(key, value_str)?);
                }
                "design.extension-length" => {
                    self.design
                        .get_or_insert_with(Default::default)
                        .extension_length = Some(parse_value(key, value_str)?);
                }
                "design.range-start" => {
                    self.design.get_or_insert_with(Default::default).range_start =
                        Some(parse_value(key, value_str)?);
                }
                "design.range-end" => {
                    self.design.get_or_insert_with(Default::default).range_end =
                        Some(parse_value(key, value_str)?);
                }
                "design.prior-temperature" => {
                    self.design
                        .get_or_insert_with(Default::default)
                        .prior_temperature = Some(parse_value(key, value_str)?);
                }
                "design.seed" => {
                    self.design.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str)?);
                }
                "candidates.filter" => {
                    self.candidates.get_or_insert_with(Default::default).filter =
                        Some(parse_enum(key, value_str)?);
                }
                "candidates.max-candidates" => {
                    self.candidates
                        .get_or_insert_with(Default::default)
                        .max_candidates = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value))
    })
}

fn parse_enum<T: ValueEnum>(key: &str, value: &str) -> Result<T> {
    <T as ValueEnum>::from_str(value.trim(), true)
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("design.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn design_args(extra: &[&str]) -> DesignArgs {
        let mut args = vec!["sequct", "design", "-s", "MKT", "-p", "profile.csv"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Design(args) => args,
            _ => panic!("Expected 'design' subcommand"),
        }
    }

    #[test]
    fn defaults_apply_without_file_or_overrides() {
        let config = PartialDesignConfig::default()
            .merge_with_cli(&design_args(&[]))
            .unwrap();

        assert_eq!(config.search.iteration_budget, DEFAULT_ITERATIONS);
        assert_eq!(config.search.exploration_weight, 1.0);
        assert_eq!(config.rounds, DEFAULT_ROUNDS);
        assert_eq!(config.move_set, core_config::MoveSet::Extend { length: 1 });
        assert_eq!(config.candidate_filter, CandidateFilter::All);
    }

    #[test]
    fn file_values_are_loaded_and_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [search]
            iterations = 400
            exploration-weight = 2.5

            [design]
            rounds = 4
            move-set = "substitute"
            range-start = 2
            seed = 9

            [candidates]
            filter = "sample"
            max-candidates = 12
            "#,
        );

        let config = PartialDesignConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&design_args(&[]))
            .unwrap();

        assert_eq!(config.search.iteration_budget, 400);
        assert_eq!(config.search.exploration_weight, 2.5);
        assert_eq!(config.rounds, 4);
        assert_eq!(
            config.move_set,
            core_config::MoveSet::Substitute {
                range: MutationRange::new(Some(2), None)
            }
        );
        assert_eq!(config.candidate_filter, CandidateFilter::Sample { limit: 12 });
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [search]
            iterations = 400

            [design]
            move-set = "substitute"
            "#,
        );

        let args = design_args(&["-n", "25", "--extend", "2", "-m", "7"]);
        let config = PartialDesignConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.search.iteration_budget, 25);
        assert_eq!(config.move_set, core_config::MoveSet::Extend { length: 2 });
        assert_eq!(config.candidate_filter, CandidateFilter::Top { limit: 7 });
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [design]
            rounds = 2
            "#,
        );

        let args = design_args(&[
            "-S",
            "design.rounds=6",
            "-S",
            "candidates.filter=top",
            "-S",
            "candidates.max-candidates=3",
        ]);
        let config = PartialDesignConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.rounds, 6);
        assert_eq!(config.candidate_filter, CandidateFilter::Top { limit: 3 });
    }

    #[test]
    fn unknown_keys_in_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [search]
            iteratons = 10
            "#,
        );
        assert!(matches!(
            PartialDesignConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for set in [
            "design.rounds",
            "design.rounds=many",
            "design.colour=red",
            "design.move-set=swap",
        ] {
            let args = design_args(&["-S", set]);
            let result = PartialDesignConfig::default().merge_with_cli(&args);
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "accepted '{}'",
                set
            );
        }
    }

    #[test]
    fn top_filter_without_limit_is_a_configuration_error() {
        let args = design_args(&["--candidate-filter", "top"]);
        let result = PartialDesignConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn stratified_filter_is_read_from_file_and_set_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [candidates]
            filter = "stratified"
            max-candidates = 16
            "#,
        );
        let config = PartialDesignConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&design_args(&[]))
            .unwrap();
        assert_eq!(
            config.candidate_filter,
            CandidateFilter::Stratified { limit: 16 }
        );

        let args = design_args(&[
            "-S",
            "candidates.filter=stratified",
            "-S",
            "candidates.max-candidates=3",
        ]);
        let config = PartialDesignConfig::default()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(
            config.candidate_filter,
            CandidateFilter::Stratified { limit: 3 }
        );
    }

    #[test]
    fn oversized_extension_is_a_configuration_error() {
        let args = design_args(&["--extend", "21"]);
        let result = PartialDesignConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_core_values_surface_as_configuration_errors() {
        let args = design_args(&["-n", "0"]);
        let result = PartialDesignConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
