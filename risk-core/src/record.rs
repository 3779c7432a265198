//! Accident record - the pre-encoding row shape shared by training and
//! serving.
//!
//! Every feature is optional: training rows arrive with holes (filled by the
//! imputers), serving requests arrive with the twelve public fields set and
//! the training-only fields absent. Columns are addressed by name so the
//! imputer and encoder stay driven by the layout in [`crate::schema`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccidentRecord {
    // Numeric
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub peso_max_decolagem: Option<f64>,
    pub numero_assentos: Option<f64>,
    pub ano_ocorrencia: Option<f64>,
    pub mes_ocorrencia: Option<f64>,

    // Categorical
    pub fase_operacao: Option<String>,
    pub cat_aeronave: Option<String>,
    pub regiao: Option<String>,
    pub uf: Option<String>,
    pub modelo_aeronave: Option<String>,
    pub nome_fabricante: Option<String>,

    // Categorical, training dataset only
    pub op_padronizado: Option<String>,
    pub hr_ocorrencia: Option<String>,
    pub pais_fabricante: Option<String>,
    pub tipo_motor: Option<String>,
    pub espectro_dano: Option<String>,
    pub tipo_operacao: Option<String>,
}

impl AccidentRecord {
    /// Numeric column by name.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "latitude" => self.latitude,
            "longitude" => self.longitude,
            "peso_max_decolagem" => self.peso_max_decolagem,
            "numero_assentos" => self.numero_assentos,
            "ano_ocorrencia" => self.ano_ocorrencia,
            "mes_ocorrencia" => self.mes_ocorrencia,
            _ => None,
        }
    }

    pub fn set_numeric(&mut self, column: &str, value: f64) {
        match column {
            "latitude" => self.latitude = Some(value),
            "longitude" => self.longitude = Some(value),
            "peso_max_decolagem" => self.peso_max_decolagem = Some(value),
            "numero_assentos" => self.numero_assentos = Some(value),
            "ano_ocorrencia" => self.ano_ocorrencia = Some(value),
            "mes_ocorrencia" => self.mes_ocorrencia = Some(value),
            _ => {}
        }
    }

    /// Categorical column by name.
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "fase_operacao" => self.fase_operacao.as_deref(),
            "cat_aeronave" => self.cat_aeronave.as_deref(),
            "regiao" => self.regiao.as_deref(),
            "uf" => self.uf.as_deref(),
            "modelo_aeronave" => self.modelo_aeronave.as_deref(),
            "nome_fabricante" => self.nome_fabricante.as_deref(),
            "op_padronizado" => self.op_padronizado.as_deref(),
            "hr_ocorrencia" => self.hr_ocorrencia.as_deref(),
            "pais_fabricante" => self.pais_fabricante.as_deref(),
            "tipo_motor" => self.tipo_motor.as_deref(),
            "espectro_dano" => self.espectro_dano.as_deref(),
            "tipo_operacao" => self.tipo_operacao.as_deref(),
            _ => None,
        }
    }

    pub fn set_categorical(&mut self, column: &str, value: String) {
        match column {
            "fase_operacao" => self.fase_operacao = Some(value),
            "cat_aeronave" => self.cat_aeronave = Some(value),
            "regiao" => self.regiao = Some(value),
            "uf" => self.uf = Some(value),
            "modelo_aeronave" => self.modelo_aeronave = Some(value),
            "nome_fabricante" => self.nome_fabricante = Some(value),
            "op_padronizado" => self.op_padronizado = Some(value),
            "hr_ocorrencia" => self.hr_ocorrencia = Some(value),
            "pais_fabricante" => self.pais_fabricante = Some(value),
            "tipo_motor" => self.tipo_motor = Some(value),
            "espectro_dano" => self.espectro_dano = Some(value),
            "tipo_operacao" => self.tipo_operacao = Some(value),
            _ => {}
        }
    }
}

/// A training row: record plus its binary label.
#[derive(Debug, Clone)]
pub struct LabeledRecord {
    pub record: AccidentRecord,
    pub fatal: bool,
}
