// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small data tables for tests.

use std::sync::Arc;

use helpdesk_agents::{AgentRegistry, FaqEntry, FaqTable, OrderRecord, OrderTable};

/// Three FAQ entries: hours, insurance and booking.
pub fn faq_table() -> FaqTable {
    let entry = |id: u32, topic: &str, keywords: &[&str], answer: &str| FaqEntry {
        id,
        topic: topic.to_string(),
        question: format!("{topic}?"),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        answer: answer.to_string(),
    };
    FaqTable::new(vec![
        entry(
            1,
            "hours",
            &["hours", "open", "close", "saturday"],
            "We are open Monday to Friday 8 AM to 6 PM and Saturday 9 AM to 1 PM.",
        ),
        entry(
            2,
            "insurance",
            &["insurance", "accept", "coverage"],
            "We accept most major insurance plans.",
        ),
        entry(
            3,
            "booking",
            &["schedule", "book", "appointment"],
            "Book online through the patient portal or call (555) 123-4567.",
        ),
    ])
}

/// Two orders: a confirmed appointment and a lab with results ready.
pub fn order_table() -> OrderTable {
    OrderTable::new(vec![
        OrderRecord {
            order_id: "APT-12345".to_string(),
            order_type: "Appointment".to_string(),
            patient_name: "Test Patient".to_string(),
            status: "Confirmed".to_string(),
            date: "2024-11-20".to_string(),
            time: "10:30 AM".to_string(),
            details: "Annual physical".to_string(),
            location: "Room 204".to_string(),
        },
        OrderRecord {
            order_id: "LAB-67890".to_string(),
            order_type: "Lab Test".to_string(),
            patient_name: "Test Patient".to_string(),
            status: "Results Ready".to_string(),
            date: "2024-11-15".to_string(),
            time: "N/A".to_string(),
            details: "Complete blood count".to_string(),
            location: "On-site Laboratory".to_string(),
        },
    ])
}

/// Standard registry over the fixture tables.
pub fn registry() -> AgentRegistry {
    AgentRegistry::standard(Arc::new(faq_table()), Arc::new(order_table()))
}
