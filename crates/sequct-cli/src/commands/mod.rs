pub mod design;
pub mod mutate;
pub mod suggest;

use crate::error::{CliError, Result};
use sequct::core::scoring::profile::ProfileModel;
use sequct::core::sequence::protein::ProteinSequence;
use std::path::Path;
use tracing::info;

pub(crate) fn parse_sequence(raw: &str) -> Result<ProteinSequence> {
    ProteinSequence::parse(raw).map_err(|e| CliError::Argument(e.to_string()))
}

pub(crate) fn load_profile(path: &Path) -> Result<ProfileModel> {
    info!("Loading fitness profile from {:?}", path);
    let model = ProfileModel::load(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!("Profile covers {} position(s).", model.len());
    Ok(model)
}
