// 📂 Batch Loader - credit requests from JSON or CSV files

use crate::form::FormSession;
use crate::schema::{Address, CreditRequest, ValidationError};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One CSV line: the request with its address flattened into columns
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CsvRow {
    pub full_name: String,
    pub identifier: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub requested_amount: String,
    pub reason: String,
}

impl From<CsvRow> for CreditRequest {
    fn from(row: CsvRow) -> Self {
        CreditRequest {
            full_name: row.full_name,
            identifier: row.identifier,
            email: row.email,
            phone: row.phone,
            address: Address {
                street: row.street,
                number: row.number,
                complement: row.complement.filter(|c| !c.is_empty()),
                neighborhood: row.neighborhood,
                city: row.city,
                state: row.state,
                postal_code: row.postal_code,
            },
            requested_amount: row.requested_amount,
            reason: row.reason,
        }
    }
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<CreditRequest>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let mut requests = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: CsvRow = result.with_context(|| format!("Failed to deserialize CSV row {}", i + 1))?;
        requests.push(row.into());
    }

    Ok(requests)
}

pub fn load_json(json_path: &Path) -> Result<Vec<CreditRequest>> {
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {:?}", json_path))?;

    serde_json::from_str(&content).context("Failed to parse credit requests JSON")
}

/// Load a batch of requests, picking the format from the file extension
pub fn load_requests(path: &Path) -> Result<Vec<CreditRequest>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let requests = match extension.as_deref() {
        Some("csv") => load_csv(path)?,
        Some("json") => load_json(path)?,
        _ => return Err(anyhow!("Unsupported file type (expected .csv or .json): {:?}", path)),
    };

    tracing::info!(count = requests.len(), path = ?path, "loaded credit requests");
    Ok(requests)
}

// ============================================================================
// BATCH VALIDATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    /// 1-based position in the batch
    pub row: usize,
    pub full_name: String,
    pub errors: Vec<ValidationError>,
}

impl RowOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<RowOutcome>,
    pub valid_count: usize,
    pub invalid_count: usize,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "{} requests: {} valid, {} invalid",
            self.rows.len(),
            self.valid_count,
            self.invalid_count
        )
    }
}

/// Validate each request after stripping mask decoration and uppercasing the
/// state. Overlong values are kept whole, so they fail instead of being cut
/// down to a valid length.
pub fn validate_batch(requests: &[CreditRequest]) -> BatchReport {
    let rows: Vec<RowOutcome> = requests
        .iter()
        .enumerate()
        .map(|(i, request)| {
            let session = FormSession::from_request(request);
            RowOutcome {
                row: i + 1,
                full_name: request.full_name.clone(),
                errors: session.errors().into_iter().cloned().collect(),
            }
        })
        .collect();

    let valid_count = rows.iter().filter(|r| r.is_valid()).count();
    let invalid_count = rows.len() - valid_count;

    BatchReport {
        rows,
        valid_count,
        invalid_count,
    }
}

// ============================================================================
// TESTS
// ============================================================================
