//! Intake encoder/decoder.
//!
//! The store keeps a flat, string-based patient record; the intake form
//! works on structured state. This module converts between the two:
//! [`decode`] recovers a [`PatientIntake`] from a stored [`Patient`] and
//! [`encode`] packs a submitted intake back into a `Patient`.
//!
//! Packing conventions:
//! - `circumstances` = `"Team: {team} | Meca: {categories} | {narrative}"`,
//!   all three segments always present even when empty;
//! - `observations` = optional `"[Soins: {categories}]\n"` prefix, then the
//!   narrative, then an optional `"\n[Décision: {label}]"` suffix with
//!   `" via {destination}"` appended for evacuations.
//!
//! The decoder never fails. Whatever the backing text looks like, every
//! field degrades to its default so the form can always open.

use crate::constants::{
    CARE_TAG_KEY, DECISION_TAG_KEY, DEFAULT_LAST_NAME, FALLBACK_COMPLAINT, MECHANISM_KEY,
    TEAM_KEY, UNKNOWN_FIRST_NAME,
};
use crate::intake::{
    Consciousness, Disposition, EvacuationMeans, PatientIntake, PulseState, Respiration, Sex,
};
use crate::patient::Patient;
use chrono::Utc;
use dps_types::TriageCategory;
use uuid::Uuid;

/// Decode a stored patient record into structured intake form state.
pub fn decode(patient: &Patient) -> PatientIntake {
    let circumstances = patient.circumstances.as_str();
    let observations = patient.observations.as_str();

    PatientIntake {
        bib_number: patient.bib_number.clone(),
        first_name: decode_first_name(&patient.first_name),
        last_name: decode_last_name(&patient.last_name),
        sex: Sex::from_stored(&patient.sex),
        age: patient.age.clone(),
        team: keyed_segment(circumstances, TEAM_KEY),

        mechanisms: split_categories(&keyed_segment(circumstances, MECHANISM_KEY)),
        mechanism_narrative: trailing_narrative(circumstances),

        consciousness: Consciousness::from_stored(&patient.consciousness),
        glasgow: patient.glasgow.clone(),
        respiration: Respiration::from_stored(&patient.respiration),
        pulse: PulseState::from_stored(&patient.pulse),
        pain_scale: patient.pain_scale.clone(),
        systolic: patient.systolic.clone(),
        diastolic: patient.diastolic.clone(),
        heart_rate: patient.heart_rate.clone(),
        respiratory_rate: patient.respiratory_rate.clone(),
        spo2: patient.spo2.clone(),
        temperature: patient.temperature.clone(),
        glycemia: patient.glycemia.clone(),

        care_actions: split_categories(&bracket_tag(observations, CARE_TAG_KEY)),
        observation_narrative: strip_tags(observations),

        disposition: Disposition::from_stored(&bracket_tag(observations, DECISION_TAG_KEY)),
        evacuation_means: EvacuationMeans::from_stored(&patient.evacuation_means),
        evacuation_destination: decision_destination(observations),
    }
}

/// Encode submitted intake state into a patient record.
///
/// When `existing` is given (edit), identity and timestamps are preserved
/// from it; otherwise a fresh id is generated and the admission timestamp
/// is set to now. Triage severity is forced to light care on every submit
/// through this path; that is a fixed policy of the intake form, not a
/// clinical computation.
pub fn encode(intake: &PatientIntake, existing: Option<&Patient>) -> Patient {
    let circumstances = format!(
        "{TEAM_KEY}: {} | {MECHANISM_KEY}: {} | {}",
        intake.team,
        intake.mechanisms.join(", "),
        intake.mechanism_narrative
    );

    let mut observations = String::new();
    if !intake.care_actions.is_empty() {
        observations.push_str(&format!(
            "[{CARE_TAG_KEY}: {}]\n",
            intake.care_actions.join(", ")
        ));
    }
    observations.push_str(&intake.observation_narrative);
    if let Some(disposition) = intake.disposition {
        observations.push_str(&format!("\n[{DECISION_TAG_KEY}: {}]", disposition.as_str()));
        if disposition == Disposition::Evacuation && !intake.evacuation_destination.is_empty() {
            observations.push_str(&format!(" via {}", intake.evacuation_destination));
        }
    }

    let last_name = if intake.last_name.trim().is_empty() {
        DEFAULT_LAST_NAME.to_string()
    } else {
        intake.last_name.trim().to_string()
    };
    // With a bib on file the patient is identifiable, so a blank first name
    // stays blank instead of getting the placeholder.
    let first_name = if intake.first_name.trim().is_empty() {
        if intake.bib_number.trim().is_empty() {
            UNKNOWN_FIRST_NAME.to_string()
        } else {
            String::new()
        }
    } else {
        intake.first_name.trim().to_string()
    };

    let chief_complaint = intake
        .mechanisms
        .first()
        .cloned()
        .unwrap_or_else(|| FALLBACK_COMPLAINT.to_string());

    let now = Utc::now();
    let (id, created_at, admitted_at, discharged_at) = match existing {
        Some(patient) => (
            patient.id.clone(),
            patient.created_at,
            patient.admitted_at,
            patient.discharged_at,
        ),
        None => (
            Uuid::new_v4().simple().to_string(),
            now,
            Some(now),
            None,
        ),
    };

    Patient {
        id,
        bib_number: intake.bib_number.trim().to_string(),
        first_name,
        last_name,
        sex: intake.sex.as_str().to_string(),
        age: intake.age.clone(),
        chief_complaint,
        triage: Some(TriageCategory::Uimp),
        circumstances,
        observations,
        consciousness: intake.consciousness.as_str().to_string(),
        glasgow: intake.glasgow.clone(),
        respiration: intake.respiration.as_str().to_string(),
        pulse: intake.pulse.as_str().to_string(),
        pain_scale: intake.pain_scale.clone(),
        systolic: intake.systolic.clone(),
        diastolic: intake.diastolic.clone(),
        heart_rate: intake.heart_rate.clone(),
        respiratory_rate: intake.respiratory_rate.clone(),
        spo2: intake.spo2.clone(),
        temperature: intake.temperature.clone(),
        glycemia: intake.glycemia.clone(),
        evacuation_means: intake
            .evacuation_means
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        admitted_at,
        discharged_at,
        created_at,
    }
}

/// Value of a `"{key}: …"` segment, read up to the next `|` delimiter.
/// Absent key yields an empty string.
fn keyed_segment(text: &str, key: &str) -> String {
    let marker = format!("{key}:");
    match text.find(&marker) {
        Some(pos) => {
            let rest = &text[pos + marker.len()..];
            let end = rest.find('|').unwrap_or(rest.len());
            rest[..end].trim().to_string()
        }
        None => String::new(),
    }
}

/// Narrative is whatever follows the last `|` delimiter; no delimiter means
/// no narrative.
fn trailing_narrative(text: &str) -> String {
    match text.rfind('|') {
        Some(pos) => text[pos + 1..].trim().to_string(),
        None => String::new(),
    }
}

/// Content of a `"[{key}: …]"` tag, or empty when the tag is absent or
/// unterminated.
fn bracket_tag(text: &str, key: &str) -> String {
    let marker = format!("[{key}:");
    let Some(start) = text.find(&marker) else {
        return String::new();
    };
    let rest = &text[start + marker.len()..];
    match rest.find(']') {
        Some(end) => rest[..end].trim().to_string(),
        None => String::new(),
    }
}

/// Destination appended after the decision tag as `" via {destination}"`,
/// read to the end of the line.
fn decision_destination(text: &str) -> String {
    let marker = format!("[{DECISION_TAG_KEY}:");
    let Some(start) = text.find(&marker) else {
        return String::new();
    };
    let Some(end) = text[start..].find(']') else {
        return String::new();
    };
    let after = &text[start + end + 1..];
    match after.strip_prefix(" via ") {
        Some(rest) => rest.lines().next().unwrap_or_default().trim().to_string(),
        None => String::new(),
    }
}

/// Strip the care and decision tags (including a trailing `" via …"`) from
/// the observations, leaving only the narrative shown for editing.
fn strip_tags(observations: &str) -> String {
    let mut out = observations.to_string();

    if let Some(start) = out.find(&format!("[{CARE_TAG_KEY}:")) {
        if let Some(end) = out[start..].find(']') {
            out.replace_range(start..start + end + 1, "");
        }
    }

    if let Some(start) = out.find(&format!("[{DECISION_TAG_KEY}:")) {
        if let Some(end) = out[start..].find(']') {
            let mut cut = start + end + 1;
            if out[cut..].starts_with(" via ") {
                cut = out[cut..]
                    .find('\n')
                    .map(|i| cut + i)
                    .unwrap_or(out.len());
            }
            out.replace_range(start..cut, "");
        }
    }

    out.trim().to_string()
}

/// Split a comma-joined category value into its entries.
fn split_categories(value: &str) -> Vec<String> {
    value
        .split(", ")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn decode_first_name(stored: &str) -> String {
    if stored == UNKNOWN_FIRST_NAME || stored.starts_with('#') {
        String::new()
    } else {
        stored.to_string()
    }
}

fn decode_last_name(stored: &str) -> String {
    if stored == DEFAULT_LAST_NAME || stored == UNKNOWN_FIRST_NAME {
        String::new()
    } else {
        stored.to_string()
    }
}
