//! Immutable model context
//!
//! The static tables are loaded and normalized once per process and passed
//! by reference to every batch.

use crate::error::{ModelError, ModelResult};
use crate::models::{
    AWeightingCurve, AttenuationMatrix, EmissionCoefficients, RawAWeighting, RawCoefficientRow,
    RawStreetParams, StreetParameterIndex,
};
use crate::services::{normalize_attenuation, normalize_street_params, parse_coefficient_table};
use outfit_common::config::{AttenuationColumns, TomlConfig};
use outfit_common::{observe_stage, StageObserver, Table};
use std::path::Path;
use tracing::{info, warn};

/// Normalized static tables of one model run
#[derive(Debug, Clone)]
pub struct ModelContext {
    pub street_params: StreetParameterIndex,
    pub coefficients: EmissionCoefficients,
    pub a_weighting: AWeightingCurve,
    pub attenuation: AttenuationMatrix,
}

/// Raw static tables as read from disk
#[derive(Debug, Clone)]
pub struct StaticTables {
    pub street_params: Table,
    pub freq_coeffs: Table,
    pub curve_a: Table,
    pub attenuation: Table,
}

impl StaticTables {
    /// Read the parameter tables named by the configuration and the matrix
    pub fn read(config: &TomlConfig, matrix_path: &Path) -> ModelResult<Self> {
        Ok(Self {
            street_params: Table::read(&config.street_params_path())?,
            freq_coeffs: Table::read(&config.freq_coeffs_path())?,
            curve_a: Table::read(&config.curve_a_path())?,
            attenuation: Table::read(matrix_path)?,
        })
    }
}

impl ModelContext {
    /// Validate and normalize raw tables, one observed stage per table
    pub fn from_tables(
        tables: StaticTables,
        columns: &AttenuationColumns,
        observer: &dyn StageObserver,
    ) -> ModelResult<Self> {
        let street_params = observe_stage("street_params", observer, || {
            let raw: Vec<RawStreetParams> = tables.street_params.deserialize()?;
            Ok::<_, ModelError>(StreetParameterIndex::new(normalize_street_params(&raw)?))
        })?;

        let coefficients = observe_stage("freq_coeffs", observer, || {
            let raw: Vec<RawCoefficientRow> = tables.freq_coeffs.deserialize()?;
            parse_coefficient_table(&raw)
        })?;

        let a_weighting = observe_stage("curve_a", observer, || {
            let raw: Vec<RawAWeighting> = tables.curve_a.deserialize()?;
            if raw.len() > 1 {
                warn!(rows = raw.len(), "A-weighting table has several rows, using the first");
            }
            let first = raw.first().ok_or(ModelError::EmptyAWeighting)?;
            AWeightingCurve::try_from(first)
        })?;

        let attenuation = observe_stage("attenuation_matrix", observer, || {
            normalize_attenuation(tables.attenuation, columns)
        })?;

        info!(
            street_params = street_params.len(),
            vehicle_classes = coefficients.len(),
            attenuation_entries = attenuation.len(),
            "Model context ready"
        );

        Ok(Self {
            street_params,
            coefficients,
            a_weighting,
            attenuation,
        })
    }

    /// Read and normalize every static table
    pub fn load(
        config: &TomlConfig,
        matrix_path: &Path,
        observer: &dyn StageObserver,
    ) -> ModelResult<Self> {
        let tables = StaticTables::read(config, matrix_path)?;
        Self::from_tables(tables, &config.attenuation, observer)
    }
}
