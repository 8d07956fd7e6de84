// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screen for requests the helpdesk must not answer.
//!
//! Every agent runs [`screen`] before consulting its table. Medical-advice
//! requests get a refusal that points to a qualified professional; emergency
//! phrasing gets the emergency instruction instead.

use std::sync::LazyLock;

use helpdesk_core::{AgentResponse, ResponseOutcome};
use regex::Regex;
use strum::{Display, IntoStaticStr};

/// Refusal for medical-advice requests.
pub const MEDICAL_ADVICE_REFUSAL: &str = "I'm not able to give medical advice, such as \
guidance on medications, dosages, symptoms or treatment. Please speak with your doctor or \
pharmacist. You can call our office at (555) 123-4567 to arrange a consultation.";

/// Response for emergency phrasing.
pub const EMERGENCY_REFUSAL: &str = "If you are experiencing a medical emergency, call 911 \
or go to the nearest emergency room right away. This service cannot provide medical advice.";

/// Checked first; an emergency outranks a plain advice request.
static EMERGENCY: LazyLock<Regex> = LazyLock::new(|| {
    whole_words(&[
        "medical emergency",
        r"chest pains?",
        r"can[’']?t breathe",
        "cannot breathe",
        "trouble breathing",
        "difficulty breathing",
        "heart attack",
        "stroke",
        r"overdos(?:e|ed|ing)",
        "unconscious",
        "bleeding heavily",
        "severe bleeding",
        r"suicid\w*",
        "kill myself",
    ])
});

/// Advice requests on their own, whatever else the query says.
static MEDICAL_ADVICE: LazyLock<Regex> = LazyLock::new(|| {
    whole_words(&[
        r"dosages?",
        r"doses?",
        "dosing",
        r"how (?:much|many) should i take",
        r"side effects?",
        r"symptoms?",
        r"diagnos\w*",
        "treatment for",
        r"how (?:do|should) i treat",
        r"(?:what|which) (?:medications?|medicines?)",
        "is this normal",
        "should i be worried",
        "interpret my",
        "what do my results mean",
        r"mix(?:ed|ing)? with alcohol",
    ])
});

/// Intake questions. Advice only when the query also names a medication.
static INTAKE: LazyLock<Regex> = LazyLock::new(|| {
    whole_words(&[
        r"(?:can|should) i (?:take|stop taking)",
        "safe to take",
        "is it safe",
    ])
});

static MEDICATION: LazyLock<Regex> = LazyLock::new(|| {
    whole_words(&[
        r"pills?",
        r"tablets?",
        r"capsules?",
        r"medications?",
        r"medicines?",
        "meds",
        r"drugs?",
        r"antibiotics?",
        r"painkillers?",
        "aspirin",
        "ibuprofen",
        "advil",
        "tylenol",
        "acetaminophen",
        "paracetamol",
        "insulin",
        "alcohol",
        r"\d+ ?mg",
    ])
});

/// One case-insensitive alternation, anchored at word boundaries.
fn whole_words(phrases: &[&str]) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", phrases.join("|")))
        .expect("safety phrases are valid patterns")
}

/// Kind of out-of-scope request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SafetyConcern {
    Emergency,
    MedicalAdvice,
}

impl SafetyConcern {
    /// Designated response text for the concern.
    pub fn refusal_text(&self) -> &'static str {
        match self {
            SafetyConcern::Emergency => EMERGENCY_REFUSAL,
            SafetyConcern::MedicalAdvice => MEDICAL_ADVICE_REFUSAL,
        }
    }
}

/// Returns the concern raised by `text`, if any.
pub fn screen(text: &str) -> Option<SafetyConcern> {
    if EMERGENCY.is_match(text) {
        Some(SafetyConcern::Emergency)
    } else if MEDICAL_ADVICE.is_match(text)
        || (INTAKE.is_match(text) && MEDICATION.is_match(text))
    {
        Some(SafetyConcern::MedicalAdvice)
    } else {
        None
    }
}

/// Refusal response from `agent` when `text` raises a concern.
pub fn refusal(agent: &'static str, text: &str) -> Option<AgentResponse> {
    screen(text).map(|concern| {
        tracing::info!(agent, concern = %concern, "refused out-of-scope request");
        AgentResponse::new(agent, concern.refusal_text(), ResponseOutcome::Refused)
    })
}
