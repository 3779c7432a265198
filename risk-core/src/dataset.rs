//! Training dataset loading.
//!
//! The source CSVs (`treino.csv`, `teste.csv`) are Latin-1 encoded and
//! comma-delimited. Rows are feature-engineered on the way in; rows without
//! a parseable occurrence date or without a label are dropped (and counted)
//! before anything downstream is fitted - the date drives two derived
//! features and silently imputing it would poison them.

use std::path::Path;

use log::{info, warn};

use crate::error::PipelineError;
use crate::features;
use crate::record::{AccidentRecord, LabeledRecord};
use crate::schema::{DATE_COLUMN, LABEL_COLUMN};

/// A loaded training dataset plus its drop counters.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<LabeledRecord>,
    pub dropped_no_date: usize,
    pub dropped_no_label: usize,
}

impl Dataset {
    pub fn labels(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.fatal).collect()
    }

    pub fn records(&self) -> Vec<AccidentRecord> {
        self.rows.iter().map(|r| r.record.clone()).collect()
    }
}

/// Load and feature-engineer a labeled CSV. A missing or unreadable file is
/// fatal to the run.
pub fn load_csv(path: &Path) -> Result<Dataset, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::UpstreamData(format!("{}: {}", path.display(), e)))?;

    let headers = reader
        .byte_headers()
        .map_err(|e| PipelineError::UpstreamData(format!("{}: {}", path.display(), e)))?
        .clone();
    let column_index = |name: &str| -> Option<usize> {
        headers.iter().position(|h| decode_latin1(h) == name)
    };

    let date_idx = column_index(DATE_COLUMN)
        .ok_or_else(|| missing_column(path, DATE_COLUMN))?;
    let label_idx = column_index(LABEL_COLUMN)
        .ok_or_else(|| missing_column(path, LABEL_COLUMN))?;

    let field_indices = FieldIndices {
        latitude: column_index("latitude"),
        longitude: column_index("longitude"),
        peso_max_decolagem: column_index("peso_max_decolagem"),
        numero_assentos: column_index("numero_assentos"),
        fase_operacao: column_index("fase_operacao"),
        cat_aeronave: column_index("cat_aeronave"),
        regiao: column_index("regiao"),
        uf: column_index("uf"),
        modelo_aeronave: column_index("modelo_aeronave"),
        nome_fabricante: column_index("nome_fabricante"),
        op_padronizado: column_index("op_padronizado"),
        hr_ocorrencia: column_index("hr_ocorrencia"),
        pais_fabricante: column_index("pais_fabricante"),
        tipo_motor: column_index("tipo_motor"),
        espectro_dano: column_index("espectro_dano"),
        tipo_operacao: column_index("tipo_operacao"),
    };

    let mut rows = Vec::new();
    let mut dropped_no_date = 0usize;
    let mut dropped_no_label = 0usize;

    for result in reader.byte_records() {
        let raw = result
            .map_err(|e| PipelineError::UpstreamData(format!("{}: {}", path.display(), e)))?;
        let field = |idx: Option<usize>| idx.and_then(|i| raw.get(i)).map(decode_latin1);

        let Some(calendar) = field(Some(date_idx)).and_then(|v| features::derive_calendar(&v))
        else {
            dropped_no_date += 1;
            continue;
        };

        let Some(label) = field(Some(label_idx)).and_then(|v| features::parse_float(&v)) else {
            dropped_no_label += 1;
            continue;
        };

        let record = AccidentRecord {
            latitude: field(field_indices.latitude)
                .and_then(|v| features::parse_decimal_comma(&v)),
            longitude: field(field_indices.longitude)
                .and_then(|v| features::parse_decimal_comma(&v)),
            peso_max_decolagem: field(field_indices.peso_max_decolagem)
                .and_then(|v| features::parse_float(&v)),
            numero_assentos: field(field_indices.numero_assentos)
                .and_then(|v| features::parse_float(&v)),
            ano_ocorrencia: Some(f64::from(calendar.year)),
            mes_ocorrencia: Some(f64::from(calendar.month)),
            fase_operacao: field(field_indices.fase_operacao)
                .and_then(|v| features::parse_category(&v)),
            cat_aeronave: field(field_indices.cat_aeronave)
                .and_then(|v| features::parse_category(&v)),
            regiao: field(field_indices.regiao).and_then(|v| features::parse_category(&v)),
            uf: field(field_indices.uf).and_then(|v| features::parse_category(&v)),
            modelo_aeronave: field(field_indices.modelo_aeronave)
                .and_then(|v| features::parse_category(&v)),
            nome_fabricante: field(field_indices.nome_fabricante)
                .and_then(|v| features::parse_category(&v)),
            op_padronizado: field(field_indices.op_padronizado)
                .and_then(|v| features::parse_category(&v)),
            hr_ocorrencia: field(field_indices.hr_ocorrencia)
                .and_then(|v| features::parse_category(&v)),
            pais_fabricante: field(field_indices.pais_fabricante)
                .and_then(|v| features::parse_category(&v)),
            tipo_motor: field(field_indices.tipo_motor)
                .and_then(|v| features::parse_category(&v)),
            espectro_dano: field(field_indices.espectro_dano)
                .and_then(|v| features::parse_category(&v)),
            tipo_operacao: field(field_indices.tipo_operacao)
                .and_then(|v| features::parse_category(&v)),
        };

        rows.push(LabeledRecord { record, fatal: label > 0.5 });
    }

    if dropped_no_date > 0 {
        warn!("{}: {} row(s) dropped for unparseable date", path.display(), dropped_no_date);
    }
    if dropped_no_label > 0 {
        warn!("{}: {} row(s) dropped for missing label", path.display(), dropped_no_label);
    }
    info!("{}: {} usable rows", path.display(), rows.len());

    Ok(Dataset { rows, dropped_no_date, dropped_no_label })
}

struct FieldIndices {
    latitude: Option<usize>,
    longitude: Option<usize>,
    peso_max_decolagem: Option<usize>,
    numero_assentos: Option<usize>,
    fase_operacao: Option<usize>,
    cat_aeronave: Option<usize>,
    regiao: Option<usize>,
    uf: Option<usize>,
    modelo_aeronave: Option<usize>,
    nome_fabricante: Option<usize>,
    op_padronizado: Option<usize>,
    hr_ocorrencia: Option<usize>,
    pais_fabricante: Option<usize>,
    tipo_motor: Option<usize>,
    espectro_dano: Option<usize>,
    tipo_operacao: Option<usize>,
}

/// Latin-1 maps every byte to the Unicode code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn missing_column(path: &Path, column: &str) -> PipelineError {
    PipelineError::UpstreamData(format!("{}: column '{}' not found", path.display(), column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    const HEADER: &str = "dt_ocorrencia,latitude,longitude,peso_max_decolagem,numero_assentos,\
fase_operacao,cat_aeronave,regiao,uf,modelo_aeronave,nome_fabricante,les_fatais_trip";

    #[test]
    fn test_load_engineers_features() {
        let csv = format!(
            "{}\n15/06/2020,\"-23,5505\",\"-46,6333\",5700,9,DECOLAGEM,AVIAO,SUDESTE,SP,EMB-810C,EMBRAER,1\n",
            HEADER
        );
        let file = write_csv(csv.as_bytes());
        let dataset = load_csv(file.path()).unwrap();

        assert_eq!(dataset.rows.len(), 1);
        let row = &dataset.rows[0];
        assert!(row.fatal);
        assert_eq!(row.record.ano_ocorrencia, Some(2020.0));
        assert_eq!(row.record.mes_ocorrencia, Some(6.0));
        assert_eq!(row.record.latitude, Some(-23.5505));
        assert_eq!(row.record.op_padronizado, None);
    }

    #[test]
    fn test_rows_without_date_are_dropped_and_counted() {
        let csv = format!(
            "{}\n,,,5700,9,DECOLAGEM,AVIAO,SUDESTE,SP,EMB-810C,EMBRAER,0\n\
15/06/2020,\"-23,5\",\"-46,6\",5700,9,POUSO,AVIAO,SUL,RS,EMB-810C,EMBRAER,0\n",
            HEADER
        );
        let file = write_csv(csv.as_bytes());
        let dataset = load_csv(file.path()).unwrap();
        assert_eq!(dataset.rows.len(), 1);
        assert_eq!(dataset.dropped_no_date, 1);
    }

    #[test]
    fn test_rows_without_label_are_dropped_and_counted() {
        let csv = format!(
            "{}\n15/06/2020,\"-23,5\",\"-46,6\",5700,9,DECOLAGEM,AVIAO,SUDESTE,SP,EMB-810C,EMBRAER,\n",
            HEADER
        );
        let file = write_csv(csv.as_bytes());
        let dataset = load_csv(file.path()).unwrap();
        assert_eq!(dataset.rows.len(), 0);
        assert_eq!(dataset.dropped_no_label, 1);
    }

    #[test]
    fn test_latin1_values_survive_decoding() {
        // 0xC3 is 'Ã' in Latin-1; invalid as UTF-8 on its own.
        let mut csv = format!("{}\n", HEADER).into_bytes();
        csv.extend_from_slice(b"15/06/2020,\"-23,5\",\"-46,6\",5700,9,DECOLAGEM,AVI\xC3O,SUDESTE,SP,EMB-810C,EMBRAER,1\n");
        let file = write_csv(&csv);
        let dataset = load_csv(file.path()).unwrap();
        assert_eq!(dataset.rows[0].record.cat_aeronave.as_deref(), Some("AVIÃO"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_csv(Path::new("/nonexistent/treino.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamData(_)));
    }

    #[test]
    fn test_missing_label_column_is_fatal() {
        let file = write_csv(b"dt_ocorrencia,latitude\n15/06/2020,\"-23,5\"\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamData(_)));
    }
}
