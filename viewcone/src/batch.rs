//! Per-photograph pipelines over whole batches.
//!
//! Records are processed in parallel and independently: a failing
//! record is logged and skipped, never aborting the batch.

use crate::{
    AltitudeCorrector, CameraPose, Correction, Feature, FeatureAssembler, MetadataIndex,
    SubjectLocator, ViewconeError,
};
use log::{info, warn};
use rayon::prelude::*;
use terrain::TileFetch;

/// Corrects every relative altitude in `poses`, returning how many
/// poses were corrected.
pub fn correct_altitudes<F>(corrector: &AltitudeCorrector<F>, poses: &mut [CameraPose]) -> usize
where
    F: TileFetch + Sync,
{
    poses
        .par_iter_mut()
        .map(|pose| match corrector.correct(pose) {
            Ok(Correction::Corrected { .. }) => 1,
            Ok(Correction::Unchanged) => 0,
            Err(e) => {
                warn!("{}: altitude not corrected: {e}", pose.id);
                0
            }
        })
        .sum()
}

/// Returns the features of every pose with a catalog record, in
/// input order.
pub fn assemble_features<L>(
    assembler: &FeatureAssembler<L>,
    poses: &[CameraPose],
    index: &MetadataIndex,
) -> Vec<Feature>
where
    L: SubjectLocator + Sync,
{
    poses
        .par_iter()
        .filter_map(|pose| match assemble_one(assembler, pose, index) {
            Ok(feature) => {
                info!("{}: OK", pose.id);
                Some(feature)
            }
            Err(e) => {
                warn!("{}: skipped: {e}", pose.id);
                None
            }
        })
        .collect()
}

fn assemble_one<L: SubjectLocator>(
    assembler: &FeatureAssembler<L>,
    pose: &CameraPose,
    index: &MetadataIndex,
) -> Result<Feature, ViewconeError> {
    let metadata = index
        .get(&pose.id)
        .ok_or_else(|| ViewconeError::MissingMetadata(pose.id.clone()))?;
    assembler.assemble(pose, metadata, &metadata.subjects())
}
