//! Printable patient sheet ("Fiche DPS").
//!
//! Renders one patient record into a single markdown document branded with
//! the station header, and exports it to disk under the naming convention
//! `Fiche_DPS_{bib}.md` (bib falls back to `Inconnu`). Export is a
//! best-effort, single-flight operation: a busy flag refuses re-entry while
//! one export runs, and any failure is logged and leaves no partial file.

use crate::codec;
use crate::constants::UNKNOWN_FIRST_NAME;
use crate::patient::Patient;
use crate::store::HeaderInfo;
use crate::{DpsError, DpsResult};
use dps_types::BibNumber;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct ReportExporter {
    out_dir: PathBuf,
    busy: AtomicBool,
}

impl ReportExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            busy: AtomicBool::new(false),
        }
    }

    /// File name for a patient sheet: the bib number identifies the sheet,
    /// `Inconnu` stands in when none was recorded.
    pub fn file_name(patient: &Patient) -> String {
        match BibNumber::new(&patient.bib_number) {
            Ok(bib) => format!("Fiche_DPS_{bib}.md"),
            Err(_) => format!("Fiche_DPS_{UNKNOWN_FIRST_NAME}.md"),
        }
    }

    /// Render the sheet document. Pure; decoding recovers the structured
    /// intake fields from the packed record for display.
    pub fn render(header: &HeaderInfo, patient: &Patient) -> String {
        let intake = codec::decode(patient);
        let mut out = String::new();

        out.push_str(&format!("# Fiche DPS — {}\n\n", header.organization));
        if let Some(triage) = patient.triage {
            out.push_str(&format!("**Catégorie:** {triage}\n"));
        }
        if let Some(admitted) = patient.admitted_at {
            out.push_str(&format!(
                "**Admission:** {}\n",
                admitted.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            ));
        }
        if let Some(discharged) = patient.discharged_at {
            out.push_str(&format!(
                "**Sortie:** {}\n",
                discharged.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            ));
        }
        out.push('\n');

        out.push_str("## Identité\n\n");
        out.push_str(&format!("**Dossard:** {}\n", patient.bib_number));
        out.push_str(&format!(
            "**Nom:** {} {}\n",
            patient.last_name, patient.first_name
        ));
        out.push_str(&format!("**Sexe:** {}\n", patient.sex));
        out.push_str(&format!("**Âge:** {}\n", patient.age));
        out.push_str(&format!("**Équipe:** {}\n\n", intake.team));

        out.push_str("## Circonstances\n\n");
        out.push_str(&format!("**Motif d'appel:** {}\n", patient.chief_complaint));
        out.push_str(&format!("**Mécanisme:** {}\n", intake.mechanisms.join(", ")));
        if !intake.mechanism_narrative.is_empty() {
            out.push_str(&format!("\n{}\n", intake.mechanism_narrative));
        }
        out.push('\n');

        out.push_str("## Bilan\n\n");
        out.push_str(&format!(
            "**Conscience:** {} (Glasgow {})\n",
            intake.consciousness.as_str(),
            patient.glasgow
        ));
        out.push_str(&format!(
            "**Respiration:** {} ({}/min)\n",
            intake.respiration.as_str(),
            patient.respiratory_rate
        ));
        out.push_str(&format!(
            "**Pouls:** {} ({}/min)\n",
            intake.pulse.as_str(),
            patient.heart_rate
        ));
        out.push_str(&format!(
            "**Tension:** {}/{}\n",
            patient.systolic, patient.diastolic
        ));
        out.push_str(&format!("**SpO2:** {}\n", patient.spo2));
        out.push_str(&format!("**Température:** {}\n", patient.temperature));
        out.push_str(&format!("**Glycémie:** {}\n", patient.glycemia));
        out.push_str(&format!("**Douleur:** {}/10\n\n", patient.pain_scale));

        out.push_str("## Soins\n\n");
        out.push_str(&format!("**Gestes:** {}\n", intake.care_actions.join(", ")));
        if !intake.observation_narrative.is_empty() {
            out.push_str(&format!("\n{}\n", intake.observation_narrative));
        }
        out.push('\n');

        out.push_str("## Décision\n\n");
        match intake.disposition {
            Some(disposition) => {
                out.push_str(&format!("**Décision:** {}\n", disposition.as_str()));
                if let Some(means) = intake.evacuation_means {
                    out.push_str(&format!("**Moyen:** {}\n", means.as_str()));
                }
                if !intake.evacuation_destination.is_empty() {
                    out.push_str(&format!(
                        "**Destination:** {}\n",
                        intake.evacuation_destination
                    ));
                }
            }
            None => out.push_str("**Décision:** en attente\n"),
        }

        out
    }

    /// Export the sheet to the output directory.
    ///
    /// Returns the written path, or `None` when an export is already running
    /// or when rendering/writing failed (the failure is logged and any
    /// partial file removed).
    pub fn export(&self, header: &HeaderInfo, patient: &Patient) -> Option<PathBuf> {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::warn!("report export already in progress, ignoring request");
            return None;
        }

        let result = self.write_sheet(header, patient);
        self.busy.store(false, Ordering::SeqCst);

        match result {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::error!("report export failed: {err}");
                None
            }
        }
    }

    fn write_sheet(&self, header: &HeaderInfo, patient: &Patient) -> DpsResult<PathBuf> {
        fs::create_dir_all(&self.out_dir).map_err(DpsError::ReportWrite)?;
        let path = self.out_dir.join(Self::file_name(patient));
        let document = Self::render(header, patient);
        if let Err(err) = fs::write(&path, document) {
            let _ = fs::remove_file(&path);
            return Err(DpsError::ReportWrite(err));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{Disposition, EvacuationMeans, PatientIntake};

    fn header() -> HeaderInfo {
        HeaderInfo {
            organization: "Croix Blanche 74".into(),
            logo_path: None,
        }
    }

    fn evacuated_patient() -> Patient {
        let intake = PatientIntake {
            bib_number: "1047".into(),
            first_name: "Claire".into(),
            last_name: "Moreau".into(),
            mechanisms: vec!["Chute".into()],
            care_actions: vec!["Glace".into()],
            observation_narrative: "Patient stable".into(),
            disposition: Some(Disposition::Evacuation),
            evacuation_means: Some(EvacuationMeans::Ambulance),
            evacuation_destination: "CH Annecy".into(),
            ..PatientIntake::default()
        };
        codec::encode(&intake, None)
    }

    #[test]
    fn file_name_uses_bib_or_inconnu() {
        let patient = evacuated_patient();
        assert_eq!(ReportExporter::file_name(&patient), "Fiche_DPS_1047.md");

        let anonymous = Patient::default();
        assert_eq!(ReportExporter::file_name(&anonymous), "Fiche_DPS_Inconnu.md");

        let blank_bib = Patient {
            bib_number: "   ".into(),
            ..Patient::default()
        };
        assert_eq!(
            ReportExporter::file_name(&blank_bib),
            "Fiche_DPS_Inconnu.md"
        );
    }

    #[test]
    fn renders_branding_and_decision() {
        let document = ReportExporter::render(&header(), &evacuated_patient());
        assert!(document.starts_with("# Fiche DPS — Croix Blanche 74"));
        assert!(document.contains("**Décision:** Évacuation médicale"));
        assert!(document.contains("**Moyen:** Ambulance"));
        assert!(document.contains("**Destination:** CH Annecy"));
        assert!(document.contains("Patient stable"));
    }

    #[test]
    fn export_writes_the_sheet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exporter = ReportExporter::new(dir.path().join("reports"));

        let path = exporter
            .export(&header(), &evacuated_patient())
            .expect("export");
        assert!(path.ends_with("Fiche_DPS_1047.md"));
        let written = fs::read_to_string(&path).expect("read");
        assert!(written.contains("Fiche DPS"));
    }

    #[test]
    fn export_is_single_flight() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exporter = ReportExporter::new(dir.path().to_path_buf());

        exporter.busy.store(true, Ordering::SeqCst);
        assert!(exporter.export(&header(), &evacuated_patient()).is_none());

        exporter.busy.store(false, Ordering::SeqCst);
        assert!(exporter.export(&header(), &evacuated_patient()).is_some());
    }

    #[test]
    fn failed_export_produces_no_file_and_clears_busy() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A plain file where the output directory should be makes
        // create_dir_all fail.
        let blocker = dir.path().join("reports");
        fs::write(&blocker, "occupied").expect("write blocker");

        let exporter = ReportExporter::new(blocker.clone());
        assert!(exporter.export(&header(), &evacuated_patient()).is_none());
        assert!(!exporter.busy.load(Ordering::SeqCst));
        assert!(blocker.is_file());

        let err = exporter
            .write_sheet(&header(), &evacuated_patient())
            .unwrap_err();
        assert!(matches!(err, DpsError::ReportWrite(_)));
    }
}
