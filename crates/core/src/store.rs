//! Patient store and station configuration.
//!
//! The store owns persistence: patient records as sharded JSON files under
//! the data directory, and the station config (report branding plus the
//! equipment checklist catalogue) as one YAML file. Services only talk to
//! the [`PatientStore`] trait; the on-disk layout is an implementation
//! detail of [`JsonPatientStore`].

use crate::config::CoreConfig;
use crate::patient::Patient;
use crate::{DpsError, DpsResult};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Organisation branding shown on the printable report header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderInfo {
    pub organization: String,
    pub logo_path: Option<String>,
}

/// One category of the equipment-readiness checklist, with its ordered
/// item labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistCategory {
    pub name: String,
    pub items: Vec<String>,
}

/// Data-access collaborator consumed by the services.
pub trait PatientStore {
    /// All stored patient records, in no particular order.
    fn patients(&self) -> DpsResult<Vec<Patient>>;
    /// Look up a single record by id.
    fn patient(&self, id: &str) -> DpsResult<Option<Patient>>;
    /// Persist a new record; fails if the id already exists.
    fn add_patient(&self, patient: &Patient) -> DpsResult<()>;
    /// Overwrite an existing record; fails if the id is unknown.
    fn update_patient(&self, patient: &Patient) -> DpsResult<()>;
    /// Station branding for report rendering.
    fn header_info(&self) -> DpsResult<HeaderInfo>;
    /// Ordered checklist catalogue, category by category.
    fn checklist_catalogue(&self) -> DpsResult<Vec<ChecklistCategory>>;
}

// ============================================================================
// Station config wire model
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StationWire {
    header: HeaderWire,
    #[serde(default)]
    checklist: Vec<ChecklistCategoryWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HeaderWire {
    organization: String,
    #[serde(default)]
    logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChecklistCategoryWire {
    category: String,
    #[serde(default)]
    items: Vec<String>,
}

/// Parse the station YAML, surfacing the path to the failing field when the
/// document does not match the schema.
fn parse_station(yaml_text: &str) -> DpsResult<StationWire> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize::<_, StationWire>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        DpsError::StationSchema {
            path,
            source: err.into_inner(),
        }
    })
}

// ============================================================================
// JSON-on-disk store
// ============================================================================

/// File-backed [`PatientStore`].
///
/// Records live at `<data_dir>/patients/<s1>/<s2>/<32hex>/patient.json`,
/// where `s1`/`s2` are the first four hex characters of the id.
#[derive(Clone)]
pub struct JsonPatientStore {
    cfg: Arc<CoreConfig>,
}

impl JsonPatientStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn record_dir(&self, id: &str) -> DpsResult<PathBuf> {
        let id = id.trim().to_lowercase();
        if id.len() < 4 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DpsError::InvalidInput(format!("invalid patient id: {id}")));
        }
        let s1 = &id[0..2];
        let s2 = &id[2..4];
        Ok(self.cfg.patients_dir().join(s1).join(s2).join(&id))
    }

    fn record_file(&self, id: &str) -> DpsResult<PathBuf> {
        Ok(self.record_dir(id)?.join("patient.json"))
    }

    fn write_record(&self, patient: &Patient) -> DpsResult<()> {
        let dir = self.record_dir(&patient.id)?;
        fs::create_dir_all(&dir).map_err(DpsError::PatientDirCreation)?;
        let json = serde_json::to_string_pretty(patient).map_err(DpsError::Serialization)?;
        fs::write(dir.join("patient.json"), json).map_err(DpsError::FileWrite)
    }

    fn station(&self) -> DpsResult<StationWire> {
        let text =
            fs::read_to_string(self.cfg.station_file()).map_err(DpsError::StationRead)?;
        parse_station(&text)
    }
}

impl PatientStore for JsonPatientStore {
    /// Traverses the sharded directory structure and reads every
    /// `patient.json`. Records that fail to parse are logged as warnings and
    /// skipped; one corrupt file must not take the whole list down.
    fn patients(&self) -> DpsResult<Vec<Patient>> {
        let mut patients = Vec::new();

        let s1_iter = match fs::read_dir(self.cfg.patients_dir()) {
            Ok(it) => it,
            Err(_) => return Ok(patients),
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };
            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };
                for id_ent in id_iter.flatten() {
                    let record_path = id_ent.path().join("patient.json");
                    if !record_path.is_file() {
                        continue;
                    }

                    match fs::read_to_string(&record_path) {
                        Ok(contents) => match serde_json::from_str::<Patient>(&contents) {
                            Ok(patient) => patients.push(patient),
                            Err(_) => {
                                tracing::warn!(
                                    "failed to parse patient record: {}",
                                    record_path.display()
                                );
                            }
                        },
                        Err(_) => {
                            tracing::warn!(
                                "failed to read patient record: {}",
                                record_path.display()
                            );
                        }
                    }
                }
            }
        }

        Ok(patients)
    }

    fn patient(&self, id: &str) -> DpsResult<Option<Patient>> {
        let file = self.record_file(id)?;
        if !file.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&file).map_err(DpsError::FileRead)?;
        let patient = serde_json::from_str(&contents).map_err(DpsError::Deserialization)?;
        Ok(Some(patient))
    }

    fn add_patient(&self, patient: &Patient) -> DpsResult<()> {
        if self.record_file(&patient.id)?.is_file() {
            return Err(DpsError::DuplicatePatient(patient.id.clone()));
        }
        self.write_record(patient)
    }

    fn update_patient(&self, patient: &Patient) -> DpsResult<()> {
        if !self.record_file(&patient.id)?.is_file() {
            return Err(DpsError::UnknownPatient(patient.id.clone()));
        }
        self.write_record(patient)
    }

    fn header_info(&self) -> DpsResult<HeaderInfo> {
        let station = self.station()?;
        Ok(HeaderInfo {
            organization: station.header.organization,
            logo_path: station.header.logo_path,
        })
    }

    fn checklist_catalogue(&self) -> DpsResult<Vec<ChecklistCategory>> {
        let station = self.station()?;
        Ok(station
            .checklist
            .into_iter()
            .map(|wire| ChecklistCategory {
                name: wire.category,
                items: wire.items,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_in(dir: &std::path::Path) -> JsonPatientStore {
        let cfg = CoreConfig::new(dir.to_path_buf(), None).expect("config");
        JsonPatientStore::new(Arc::new(cfg))
    }

    fn sample_patient(id: &str) -> Patient {
        Patient {
            id: id.to_string(),
            first_name: "Claire".into(),
            last_name: "Moreau".into(),
            created_at: Utc::now(),
            ..Patient::default()
        }
    }

    #[test]
    fn add_then_list_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let patient = sample_patient("90a8d1ea318041d9adb070a834d4e0f6");

        store.add_patient(&patient).expect("add");
        let listed = store.patients().expect("list");
        assert_eq!(listed, vec![patient.clone()]);
        assert_eq!(store.patient(&patient.id).expect("get"), Some(patient));
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let patient = sample_patient("90a8d1ea318041d9adb070a834d4e0f6");

        store.add_patient(&patient).expect("add");
        let err = store.add_patient(&patient).unwrap_err();
        assert!(matches!(err, DpsError::DuplicatePatient(_)));
    }

    #[test]
    fn update_requires_existing_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let err = store
            .update_patient(&sample_patient("deadbeefdeadbeefdeadbeefdeadbeef"))
            .unwrap_err();
        assert!(matches!(err, DpsError::UnknownPatient(_)));
    }

    #[test]
    fn corrupt_record_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        store
            .add_patient(&sample_patient("90a8d1ea318041d9adb070a834d4e0f6"))
            .expect("add");

        let corrupt_dir = dir.path().join("patients/ff/ff/ffffffffffffffffffffffffffffffff");
        fs::create_dir_all(&corrupt_dir).expect("mkdir");
        fs::write(corrupt_dir.join("patient.json"), "not json").expect("write");

        let listed = store.patients().expect("list");
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn rejects_malformed_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let err = store.patient("../escape").unwrap_err();
        assert!(matches!(err, DpsError::InvalidInput(_)));
    }

    #[test]
    fn parses_station_header_and_checklist() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path()).expect("mkdir");
        fs::write(
            dir.path().join("station.yaml"),
            "header:\n  organization: Croix Blanche 74\n  logo_path: logo.png\nchecklist:\n  - category: Oxygénothérapie\n    items:\n      - Bouteille O2\n      - Détendeur\n  - category: Immobilisation\n    items:\n      - Attelles\n",
        )
        .expect("write");

        let store = store_in(dir.path());
        let header = store.header_info().expect("header");
        assert_eq!(header.organization, "Croix Blanche 74");
        assert_eq!(header.logo_path.as_deref(), Some("logo.png"));

        let catalogue = store.checklist_catalogue().expect("catalogue");
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue[0].name, "Oxygénothérapie");
        assert_eq!(catalogue[0].items, vec!["Bouteille O2", "Détendeur"]);
    }

    #[test]
    fn station_schema_errors_name_the_failing_path() {
        let err = parse_station("header:\n  organisation: typo\n").unwrap_err();
        match err {
            DpsError::StationSchema { path, .. } => {
                assert!(!path.is_empty());
            }
            other => panic!("expected StationSchema error, got {other:?}"),
        }
    }
}
