//! Batch runner
//!
//! One batch turns an observation table into receiver levels by running the
//! four batch stages in order, each over the whole previous table.

use crate::context::ModelContext;
use crate::error::{ModelError, ModelResult};
use crate::models::{AttenuatedRow, FlowEstimate, ReceiverLevel, SoundPowerRow};
use crate::services::{aggregate_receivers, apply_attenuation, compute_sound_power, estimate_flows};
use outfit_common::{observe_stage, StageObserver, Table, TableFormat, ToRow, TrafficObservation};
use std::path::{Path, PathBuf};
use tracing::info;

pub const FLOWS_STAGE: &str = "flows";
pub const SOUND_POWER_STAGE: &str = "sound_power";
pub const ATTENUATED_STAGE: &str = "attenuated";
pub const RECEIVERS_STAGE: &str = "receivers";

/// Every table produced by one batch
#[derive(Debug, Clone, Default)]
pub struct BatchTables {
    pub flows: Vec<FlowEstimate>,
    pub sound_power: Vec<SoundPowerRow>,
    pub attenuated: Vec<AttenuatedRow>,
    pub receivers: Vec<ReceiverLevel>,
}

impl BatchTables {
    /// Write each stage table to `<dir>/<stage>.csv`, replacing old dumps
    pub fn dump(&self, dir: &Path) -> ModelResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(outfit_common::Error::from)?;
        let written = vec![
            dump_stage(dir, FLOWS_STAGE, &self.flows)?,
            dump_stage(dir, SOUND_POWER_STAGE, &self.sound_power)?,
            dump_stage(dir, ATTENUATED_STAGE, &self.attenuated)?,
            dump_stage(dir, RECEIVERS_STAGE, &self.receivers)?,
        ];
        info!(dir = %dir.display(), tables = written.len(), "Stage tables dumped");
        Ok(written)
    }
}

fn dump_stage<T: ToRow>(dir: &Path, stage: &str, rows: &[T]) -> ModelResult<PathBuf> {
    let path = dir.join(format!("{}.csv", stage));
    Table::from_records(rows).write(&path, true)?;
    Ok(path)
}

/// Run the batch stages over a set of observations
pub fn run_batch(
    context: &ModelContext,
    observations: &[TrafficObservation],
    observer: &dyn StageObserver,
) -> ModelResult<BatchTables> {
    let flows = observe_stage(FLOWS_STAGE, observer, || {
        Ok::<_, ModelError>(estimate_flows(observations, &context.street_params))
    })?;

    let sound_power = observe_stage(SOUND_POWER_STAGE, observer, || {
        compute_sound_power(&flows, &context.coefficients, &context.a_weighting)
    })?;

    let attenuated = observe_stage(ATTENUATED_STAGE, observer, || {
        Ok::<_, ModelError>(apply_attenuation(&sound_power, &context.attenuation))
    })?;

    let receivers = observe_stage(RECEIVERS_STAGE, observer, || {
        Ok::<_, ModelError>(aggregate_receivers(&attenuated))
    })?;

    info!(
        observations = observations.len(),
        receivers = receivers.len(),
        "Batch complete"
    );

    Ok(BatchTables {
        flows,
        sound_power,
        attenuated,
        receivers,
    })
}

/// Read observations, run one batch and write the receiver table
///
/// The output is checked before any computation, so an existing file is
/// refused without doing work unless `overwrite` is set.
pub fn process_file(
    context: &ModelContext,
    input: &Path,
    output: &Path,
    overwrite: bool,
    observer: &dyn StageObserver,
) -> ModelResult<BatchTables> {
    TableFormat::from_path(output)?;
    if output.exists() && !overwrite {
        return Err(outfit_common::Error::OutputExists(output.to_path_buf()).into());
    }

    let observations: Vec<TrafficObservation> = observe_stage("observations", observer, || {
        Table::read(input)?.deserialize()
    })?;

    let tables = run_batch(context, &observations, observer)?;
    Table::from_records(&tables.receivers).write(output, overwrite)?;
    info!(path = %output.display(), rows = tables.receivers.len(), "Receiver levels written");
    Ok(tables)
}
