//! The persisted patient record.
//!
//! This is the flat entity the store actually keeps: structured intake data
//! is packed into the `circumstances` and `observations` strings by the
//! codec, every vital sign is stored as the free text entered on the form,
//! and the clinical-state enums are stored as their display labels.

use chrono::{DateTime, Utc};
use dps_types::TriageCategory;
use serde::{Deserialize, Serialize};

/// A patient record as written to and read from the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// 32-hex record identifier (uuid v4, simple form).
    pub id: String,
    #[serde(default)]
    pub bib_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub age: String,
    /// "Motif d'appel" — why the post was called.
    #[serde(default)]
    pub chief_complaint: String,
    #[serde(default)]
    pub triage: Option<TriageCategory>,

    /// Packed: `"Team: {team} | Meca: {categories} | {narrative}"`.
    #[serde(default)]
    pub circumstances: String,
    /// Packed: optional `[Soins: …]` prefix, narrative, optional
    /// `[Décision: …]` suffix with `" via {destination}"`.
    #[serde(default)]
    pub observations: String,

    #[serde(default)]
    pub consciousness: String,
    #[serde(default)]
    pub glasgow: String,
    #[serde(default)]
    pub respiration: String,
    #[serde(default)]
    pub pulse: String,
    #[serde(default)]
    pub pain_scale: String,
    #[serde(default)]
    pub systolic: String,
    #[serde(default)]
    pub diastolic: String,
    #[serde(default)]
    pub heart_rate: String,
    #[serde(default)]
    pub respiratory_rate: String,
    #[serde(default)]
    pub spo2: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub glycemia: String,

    /// Evacuation means label; empty when not applicable.
    #[serde(default)]
    pub evacuation_means: String,

    #[serde(default)]
    pub admitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discharged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Default for Patient {
    fn default() -> Self {
        Self {
            id: String::new(),
            bib_number: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            sex: String::new(),
            age: String::new(),
            chief_complaint: String::new(),
            triage: None,
            circumstances: String::new(),
            observations: String::new(),
            consciousness: String::new(),
            glasgow: String::new(),
            respiration: String::new(),
            pulse: String::new(),
            pain_scale: String::new(),
            systolic: String::new(),
            diastolic: String::new(),
            heart_rate: String::new(),
            respiratory_rate: String::new(),
            spo2: String::new(),
            temperature: String::new(),
            glycemia: String::new(),
            evacuation_means: String::new(),
            admitted_at: None,
            discharged_at: None,
            created_at: Utc::now(),
        }
    }
}

impl Patient {
    /// Timestamp used for list ordering: admission time when known,
    /// otherwise record creation time.
    pub fn admission_or_creation(&self) -> DateTime<Utc> {
        self.admitted_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_sparse_record_with_defaults() {
        let json = r#"{
            "id": "90a8d1ea318041d9adb070a834d4e0f6",
            "created_at": "2026-05-10T09:30:00Z"
        }"#;
        let patient: Patient = serde_json::from_str(json).expect("parse");
        assert!(patient.bib_number.is_empty());
        assert!(patient.triage.is_none());
        assert!(patient.admitted_at.is_none());
    }

    #[test]
    fn round_trips_triage_label() {
        let patient = Patient {
            id: "ab".repeat(16),
            triage: Some(TriageCategory::Ua),
            ..Patient::default()
        };
        let json = serde_json::to_string(&patient).expect("serialize");
        assert!(json.contains("\"UA\""));
        let back: Patient = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.triage, Some(TriageCategory::Ua));
    }
}
