use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::LeadSubmission;
use crate::workflows::mortgage::LeadFinancialsForm;

const IMPORT_SOURCE: &str = "csv_import";

#[derive(Debug)]
pub enum LeadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for LeadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadImportError::Io(err) => write!(f, "failed to read lead export: {}", err),
            LeadImportError::Csv(err) => write!(f, "invalid lead CSV data: {}", err),
        }
    }
}

impl std::error::Error for LeadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadImportError::Io(err) => Some(err),
            LeadImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LeadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads CRM lead exports. Unknown columns are ignored and every financial
/// column may be blank.
pub struct LeadCsvImporter;

impl LeadCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LeadSubmission>, LeadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LeadSubmission>, LeadImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut submissions = Vec::new();
        for row in csv_reader.deserialize::<LeadRow>() {
            submissions.push(row?.into_submission());
        }
        Ok(submissions)
    }
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bank_score: Option<String>,
    #[serde(default)]
    tipo_operacion: String,
    #[serde(default)]
    modalidad_compra: String,
    #[serde(default)]
    edad: String,
    #[serde(default)]
    ingresos_netos: String,
    #[serde(default)]
    precio_real: String,
    #[serde(default)]
    aportacion_real: String,
    #[serde(default)]
    otras_cuotas: String,
    #[serde(default)]
    financiacion_solicitada: String,
    #[serde(default)]
    tasa_interes: String,
    #[serde(default)]
    plazo_anos: String,
}

impl LeadRow {
    fn into_submission(self) -> LeadSubmission {
        LeadSubmission {
            name: self.name,
            email: self.email,
            phone: self.phone,
            source: Some(IMPORT_SOURCE.to_string()),
            bank_score: self
                .bank_score
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u16>().ok()),
            financials: LeadFinancialsForm {
                tipo_operacion: self.tipo_operacion,
                modalidad_compra: self.modalidad_compra,
                edad: self.edad,
                ingresos_netos: self.ingresos_netos,
                precio_real: self.precio_real,
                aportacion_real: self.aportacion_real,
                otras_cuotas: self.otras_cuotas,
                financiacion_solicitada: self.financiacion_solicitada,
                tasa_interes: self.tasa_interes,
                plazo_anos: self.plazo_anos,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
