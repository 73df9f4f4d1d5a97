//! Session store collaborator: the single hand-off point between the form
//! stage and the preview/export stage.
//!
//! The record is serialized once, as one unit, under the `employeeData` key,
//! and read back exactly once. One writer, one reader, never concurrent.

use crate::error::AppError;
use crate::record::EmployeeRecord;
use log::debug;
use std::collections::HashMap;

/// Key under which the serialized record is held.
pub const EMPLOYEE_DATA_KEY: &str = "employeeData";

/// Parse a serialized record payload. Shared by the store and by the CLI
/// when it loads the record file directly.
pub fn parse_record(payload: &str) -> Result<EmployeeRecord, AppError> {
    serde_json::from_str(payload).map_err(|e| AppError::DataCorrupt(e.to_string()))
}

/// Transient in-memory key/value store scoped to one session.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Serialize the whole record as one unit under `employeeData`.
    pub fn save_record(&mut self, record: &EmployeeRecord) -> Result<(), AppError> {
        let payload =
            serde_json::to_string(record).map_err(|e| AppError::DataCorrupt(e.to_string()))?;
        debug!("storing {} bytes under {}", payload.len(), EMPLOYEE_DATA_KEY);
        self.set(EMPLOYEE_DATA_KEY, payload);
        Ok(())
    }

    /// Read the record back, consuming the entry. Absence routes the user
    /// back to the form; a parse failure does the same.
    pub fn take_record(&mut self) -> Result<EmployeeRecord, AppError> {
        let payload = self
            .entries
            .remove(EMPLOYEE_DATA_KEY)
            .ok_or(AppError::DataUnavailable)?;
        parse_record(&payload)
    }
}
