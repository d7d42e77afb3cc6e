//! Attenuation matrix normalization
//!
//! The propagation tool exports the matrix with its own headers
//! (receiver, source, period, coordinates and one "<freq>Hz dB(A)" column
//! per band). Its period column carries Ld/Le/Lx/Ln, which tag vehicle
//! classes f1/f2/f3/f4 rather than times of day.

use crate::error::{ModelError, ModelResult};
use crate::models::{AttenuationMatrix, FrequencyBand, RawAttenuationRow, VehicleClass};
use outfit_common::config::AttenuationColumns;
use outfit_common::Table;

const RAW_TABLE_NAME: &str = "attenuation matrix (external)";

/// Vehicle class for a period code; canonical class codes pass through
pub fn remap_period_code(code: &str) -> ModelResult<VehicleClass> {
    let code = code.trim();
    match VehicleClass::from_period_code(code) {
        Some(class) => Ok(class),
        None => code
            .parse::<VehicleClass>()
            .map_err(|_| ModelError::UnknownPeriodCode(code.to_string())),
    }
}

/// Rename external headers to canonical names and remap period codes in place
pub fn canonicalize_attenuation_table(
    table: &mut Table,
    columns: &AttenuationColumns,
) -> ModelResult<()> {
    let mut renames: Vec<(String, String)> = vec![
        (columns.receiver_column.clone(), "receiver".to_string()),
        (columns.source_column.clone(), "id".to_string()),
        (columns.period_column.clone(), "vehicle_type".to_string()),
        (columns.x_column.clone(), "X".to_string()),
        (columns.y_column.clone(), "Y".to_string()),
    ];
    renames.extend(
        FrequencyBand::ALL
            .iter()
            .map(|band| (columns.band_header(band.hz()), band.label().to_string())),
    );

    let external: Vec<&str> = renames.iter().map(|(from, _)| from.as_str()).collect();
    table.require_columns(RAW_TABLE_NAME, &external)?;

    for (from, to) in &renames {
        table.rename_column(from, to);
    }

    table.map_column("vehicle_type", |code| {
        remap_period_code(code).map(|class| class.code().to_string())
    })
}

/// Normalize an externally produced attenuation table into the lookup matrix
pub fn normalize_attenuation(
    mut table: Table,
    columns: &AttenuationColumns,
) -> ModelResult<AttenuationMatrix> {
    canonicalize_attenuation_table(&mut table, columns)?;
    let rows: Vec<RawAttenuationRow> = table.deserialize()?;
    Ok(AttenuationMatrix::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use outfit_common::Error;

    const HEADER: &str = "Ricevitore,Sorgente,ora intervallo,X/m,Y/m,63Hz dB(A),125Hz dB(A),250Hz dB(A),500Hz dB(A),1000Hz dB(A),2000Hz dB(A),4000Hz dB(A),8000Hz dB(A)";

    fn table(body: &str) -> Table {
        Table::read_csv(format!("{}\n{}", HEADER, body).as_bytes()).unwrap()
    }

    #[test]
    fn test_period_codes_remapped() {
        assert_eq!(remap_period_code("Ld").unwrap(), VehicleClass::Light);
        assert_eq!(remap_period_code("Ln").unwrap(), VehicleClass::PoweredTwoWheeler);
        assert_eq!(remap_period_code("f2").unwrap(), VehicleClass::MediumHeavy);
        assert!(matches!(
            remap_period_code("Lden"),
            Err(ModelError::UnknownPeriodCode(code)) if code == "Lden"
        ));
    }

    #[test]
    fn test_headers_renamed() {
        let mut t = table("R1,12,Ld,10.5,20.5,-1,-2,-3,-4,-5,-6,-7,-8\n");
        canonicalize_attenuation_table(&mut t, &AttenuationColumns::default()).unwrap();
        assert_eq!(
            t.headers(),
            &[
                "receiver", "id", "vehicle_type", "X", "Y", "63", "125", "250", "500", "1000",
                "2000", "4000", "8000"
            ]
        );
        assert_eq!(t.rows()[0][2], "f1");
    }

    #[test]
    fn test_matrix_lookup_after_normalization() {
        let t = table("R1,12,Le,10.5,20.5,-1,,-3,-4,-5,-6,-7,-8\nR2,12,Le,1,2,0,0,0,0,0,0,0,0\n");
        let matrix = normalize_attenuation(t, &AttenuationColumns::default()).unwrap();
        let entries = matrix.lookup("12", VehicleClass::MediumHeavy);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].receiver.x, 10.5);
        assert_eq!(entries[0].corrections[FrequencyBand::Hz125], 0.0);
        assert_eq!(entries[0].corrections[FrequencyBand::Hz8000], -8.0);
    }

    #[test]
    fn test_unknown_period_code_fails() {
        let t = table("R1,12,Lden,0,0,0,0,0,0,0,0,0,0\n");
        assert!(matches!(
            normalize_attenuation(t, &AttenuationColumns::default()),
            Err(ModelError::UnknownPeriodCode(_))
        ));
    }

    #[test]
    fn test_missing_external_columns_named() {
        let t = Table::read_csv("Ricevitore,Sorgente\nR1,1\n".as_bytes()).unwrap();
        match normalize_attenuation(t, &AttenuationColumns::default()) {
            Err(ModelError::Common(Error::MissingColumns { columns, .. })) => {
                assert!(columns.contains(&"ora intervallo".to_string()));
                assert!(columns.contains(&"500Hz dB(A)".to_string()));
                assert!(!columns.contains(&"Ricevitore".to_string()));
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_column_names() {
        let columns = AttenuationColumns {
            receiver_column: "Receiver".to_string(),
            source_column: "Source".to_string(),
            period_column: "Period".to_string(),
            x_column: "X".to_string(),
            y_column: "Y".to_string(),
            band_suffix: " Hz".to_string(),
        };
        let csv = "Receiver,Source,Period,X,Y,63 Hz,125 Hz,250 Hz,500 Hz,1000 Hz,2000 Hz,4000 Hz,8000 Hz\nA,s1,f4,0,0,1,1,1,1,1,1,1,1\n";
        let t = Table::read_csv(csv.as_bytes()).unwrap();
        let matrix = normalize_attenuation(t, &columns).unwrap();
        assert_eq!(matrix.lookup("s1", VehicleClass::PoweredTwoWheeler).len(), 1);
    }
}
