// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order agent: reports the status of appointments, lab tests and
//! prescriptions looked up by exact identifier.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use helpdesk_core::{Agent, AgentResponse, HelpdeskError, Query, ResponseOutcome, find_identifier};
use serde::{Deserialize, Serialize};

use crate::safety;

/// Response when the query carries no identifier.
pub const MISSING_ID_TEXT: &str = "I couldn't find an order ID in your query. \
Please provide an order ID (e.g., APT-12345, LAB-67890, or RX-11223).";

const BUILTIN_ORDERS: &str = include_str!("../data/orders.json");

/// Time value meaning "no time of day recorded".
const NO_TIME: &str = "N/A";

/// Response for an identifier with no record. Names the identifier and
/// never describes a record.
pub fn not_found_text(order_id: &str) -> String {
    format!(
        "I couldn't find any order with ID {order_id}. Please check the order ID and try again, \
         or contact our office at (555) 123-4567."
    )
}

/// One appointment, lab test or prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_type: String,
    pub patient_name: String,
    pub status: String,
    pub date: String,
    /// Time of day, or `"N/A"`.
    pub time: String,
    pub details: String,
    pub location: String,
}

impl OrderRecord {
    /// Multi-line status summary shown to the customer.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Order {} - {}", self.order_id, self.order_type);
        let _ = writeln!(out, "Patient: {}", self.patient_name);
        let _ = writeln!(out, "Status: {}", self.status);
        if self.time == NO_TIME {
            let _ = writeln!(out, "Date: {}", self.date);
        } else {
            let _ = writeln!(out, "Date & Time: {} at {}", self.date, self.time);
        }
        let _ = writeln!(out, "Details: {}", self.details);
        let _ = write!(out, "Location: {}", self.location);
        out
    }
}

#[derive(Debug, Deserialize)]
struct OrderFile {
    orders: Vec<OrderRecord>,
}

/// Read-only order table keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct OrderTable {
    by_id: HashMap<String, OrderRecord>,
}

impl OrderTable {
    /// Builds a table; a later record with a duplicate identifier replaces the earlier one.
    pub fn new(records: Vec<OrderRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.order_id.trim().to_uppercase();
            if by_id.insert(id.clone(), record).is_some() {
                tracing::warn!(order_id = %id, "duplicate order identifier in table");
            }
        }
        Self { by_id }
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, HelpdeskError> {
        Self::from_json_str(BUILTIN_ORDERS, Path::new("<built-in orders>"))
    }

    /// Parses an `{"orders": [...]}` document; `origin` names it in errors.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, HelpdeskError> {
        let file: OrderFile = serde_json::from_str(json).map_err(|e| HelpdeskError::Data {
            path: origin.to_path_buf(),
            source: Box::new(e),
        })?;
        Ok(Self::new(file.orders))
    }

    pub fn from_path(path: &Path) -> Result<Self, HelpdeskError> {
        let json = std::fs::read_to_string(path).map_err(|e| HelpdeskError::Data {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let table = Self::from_json_str(&json, path)?;
        tracing::debug!(path = %path.display(), records = table.len(), "loaded order table");
        Ok(table)
    }

    /// Exact identifier lookup.
    pub fn get(&self, order_id: &str) -> Option<&OrderRecord> {
        self.by_id.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Answers order-status queries from an [`OrderTable`].
#[derive(Debug, Clone)]
pub struct OrderAgent {
    table: Arc<OrderTable>,
}

impl OrderAgent {
    pub const NAME: &'static str = "order_status";

    pub fn new(table: Arc<OrderTable>) -> Self {
        Self { table }
    }
}

impl Agent for OrderAgent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&self, query: &Query) -> AgentResponse {
        if let Some(refusal) = safety::refusal(Self::NAME, query.text()) {
            return refusal;
        }

        let Some(order_id) = find_identifier(query.text()) else {
            return AgentResponse::new(Self::NAME, MISSING_ID_TEXT, ResponseOutcome::NeedsIdentifier);
        };

        match self.table.get(&order_id) {
            Some(record) => {
                AgentResponse::new(Self::NAME, record.summary(), ResponseOutcome::Answered)
            }
            None => {
                tracing::debug!(order_id = %order_id, "no order record");
                AgentResponse::new(
                    Self::NAME,
                    not_found_text(&order_id),
                    ResponseOutcome::NotFound,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> OrderAgent {
        OrderAgent::new(Arc::new(OrderTable::builtin().unwrap()))
    }

    #[test]
    fn known_appointment_is_summarized() {
        let response = agent().handle(&Query::new("Where is my order APT-12345?"));
        assert_eq!(response.outcome(), ResponseOutcome::Answered);
        assert!(response.text().contains("APT-12345"));
        assert!(response.text().contains("Status:"));
        assert!(response.text().contains("Date & Time:"));
    }

    #[test]
    fn record_without_time_shows_date_only() {
        let response = agent().handle(&Query::new("Is my prescription RX-11223 ready?"));
        assert!(response.text().contains("Date: "));
        assert!(!response.text().contains("Date & Time"));
        assert!(response.text().ends_with("Location: Springfield Pharmacy, 45 Main Street"));
    }

    #[test]
    fn unknown_identifier_is_not_fabricated() {
        let response = agent().handle(&Query::new("Check order APT-99999"));
        assert_eq!(response.outcome(), ResponseOutcome::NotFound);
        assert_eq!(response.text(), not_found_text("APT-99999"));
        assert!(!response.text().contains("Status:"));
    }

    #[test]
    fn missing_identifier_asks_for_one() {
        let response = agent().handle(&Query::new("I need my appointment info"));
        assert_eq!(response.outcome(), ResponseOutcome::NeedsIdentifier);
        assert_eq!(response.text(), MISSING_ID_TEXT);
    }

    #[test]
    fn lowercase_identifier_is_found() {
        let response = agent().handle(&Query::new("status of lab-67890 please"));
        assert_eq!(response.outcome(), ResponseOutcome::Answered);
        assert!(response.text().contains("LAB-67890"));
    }

    #[test]
    fn medication_question_is_refused_even_with_identifier() {
        let response = agent().handle(&Query::new(
            "Is it safe to drink alcohol with prescription RX-11223?",
        ));
        assert_eq!(response.outcome(), ResponseOutcome::Refused);
    }

    #[test]
    fn builtin_table_has_the_demo_records() {
        let table = OrderTable::builtin().unwrap();
        for id in ["APT-12345", "LAB-67890", "RX-11223", "APT-56789"] {
            assert!(table.get(id).is_some(), "{id}");
        }
        assert!(table.get("APT-99999").is_none());
    }

    #[test]
    fn table_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(
            &path,
            r#"{"orders": [{"order_id": "rx-00001", "order_type": "Prescription",
                "patient_name": "A", "status": "Ready", "date": "2024-01-01",
                "time": "N/A", "details": "d", "location": "l"}]}"#,
        )
        .unwrap();
        let table = OrderTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("RX-00001").is_some());
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let err = OrderTable::from_path(Path::new("/nonexistent/orders.json")).unwrap_err();
        assert!(matches!(err, HelpdeskError::Data { .. }));
    }
}
