//! Active triage list ordering and aggregation.
//!
//! A pure filter/sort/count pipeline over patient records: no side effects,
//! no mutation of the input beyond the returned ordering.

use crate::constants::EVACUATION_MARKER;
use crate::patient::Patient;
use dps_types::{severity_rank, TriageCategory};

/// A patient belongs to the active list once anything at all has been
/// recorded for them: a triage status, a bib number, or an admission time.
pub fn is_active(patient: &Patient) -> bool {
    patient.triage.is_some()
        || !patient.bib_number.trim().is_empty()
        || patient.admitted_at.is_some()
}

/// Filter the active patients and order them for the triage board.
///
/// Primary key: severity rank ascending (UA first, untriaged last).
/// Secondary key: admission-or-creation time descending, so the most recent
/// arrival within a severity band is shown first.
pub fn active_list(patients: &[Patient]) -> Vec<Patient> {
    let mut active: Vec<Patient> = patients.iter().filter(|p| is_active(p)).cloned().collect();
    active.sort_by(|a, b| {
        severity_rank(a.triage)
            .cmp(&severity_rank(b.triage))
            .then_with(|| b.admission_or_creation().cmp(&a.admission_or_creation()))
    });
    active
}

/// Counts over the active list, partitioned by severity and by whether the
/// observation text carries the evacuation marker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriageSummary {
    pub ua: usize,
    pub ur: usize,
    pub uimp: usize,
    pub deceased: usize,
    pub untriaged: usize,
    pub evacuations: usize,
}

impl TriageSummary {
    /// Aggregate the active patients out of `patients`.
    pub fn of(patients: &[Patient]) -> Self {
        let mut summary = TriageSummary::default();
        for patient in patients.iter().filter(|p| is_active(p)) {
            match patient.triage {
                Some(TriageCategory::Ua) => summary.ua += 1,
                Some(TriageCategory::Ur) => summary.ur += 1,
                Some(TriageCategory::Uimp) => summary.uimp += 1,
                Some(TriageCategory::Deceased) => summary.deceased += 1,
                None => summary.untriaged += 1,
            }
            if patient.observations.contains(EVACUATION_MARKER) {
                summary.evacuations += 1;
            }
        }
        summary
    }

    /// Total number of active patients.
    pub fn total(&self) -> usize {
        self.ua + self.ur + self.uimp + self.deceased + self.untriaged
    }
}
