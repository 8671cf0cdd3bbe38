//! Intake and patient-tracking operations.
//!
//! One service instance wires a [`PatientStore`] to a [`Notifier`]. Every
//! persistence failure is reported exactly once through the notifier and
//! returned to the caller; in-memory form state is never touched on
//! failure, so the user can simply retry. There is no retry loop, no
//! locking and no timeout: last write wins at the store.

use crate::codec;
use crate::intake::PatientIntake;
use crate::notify::{Notice, Notifier};
use crate::patient::Patient;
use crate::store::PatientStore;
use crate::{DpsError, DpsResult};
use chrono::Utc;
use dps_types::TriageCategory;

pub struct IntakeService<S, N> {
    store: S,
    notifier: N,
}

impl<S: PatientStore, N: Notifier> IntakeService<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open an intake form session: decode the existing record for an edit,
    /// or start from defaults for a new registration.
    pub fn open(&self, existing: Option<&Patient>) -> PatientIntake {
        match existing {
            Some(patient) => codec::decode(patient),
            None => PatientIntake::default(),
        }
    }

    /// Submit an intake form: encode and persist.
    ///
    /// Returns the persisted record. On failure the intake state held by the
    /// caller is unchanged and the error has already been notified.
    pub fn submit(
        &self,
        intake: &PatientIntake,
        existing: Option<&Patient>,
    ) -> DpsResult<Patient> {
        let patient = codec::encode(intake, existing);
        let result = match existing {
            Some(_) => self.store.update_patient(&patient),
            None => self.store.add_patient(&patient),
        };
        match result {
            Ok(()) => Ok(patient),
            Err(err) => {
                self.notifier.notify(
                    &format!("Échec de l'enregistrement du patient: {err}"),
                    Notice::Error,
                );
                Err(err)
            }
        }
    }

    /// Change the triage severity of a stored patient.
    pub fn set_triage(&self, id: &str, category: TriageCategory) -> DpsResult<Patient> {
        self.modify(id, |patient| patient.triage = Some(category))
    }

    /// Discharge a patient: stamp the exit time, leaving the record (and its
    /// triage status) in place for the event report.
    pub fn discharge(&self, id: &str) -> DpsResult<Patient> {
        self.modify(id, |patient| patient.discharged_at = Some(Utc::now()))
    }

    fn modify(&self, id: &str, apply: impl FnOnce(&mut Patient)) -> DpsResult<Patient> {
        let result = self.store.patient(id).and_then(|found| {
            let mut patient = found.ok_or_else(|| DpsError::UnknownPatient(id.to_string()))?;
            apply(&mut patient);
            self.store.update_patient(&patient)?;
            Ok(patient)
        });
        match result {
            Ok(patient) => Ok(patient),
            Err(err) => {
                self.notifier.notify(
                    &format!("Échec de la mise à jour du patient: {err}"),
                    Notice::Error,
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ChecklistCategory, HeaderInfo};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryStore {
        patients: RefCell<Vec<Patient>>,
        fail_writes: bool,
    }

    impl PatientStore for MemoryStore {
        fn patients(&self) -> DpsResult<Vec<Patient>> {
            Ok(self.patients.borrow().clone())
        }

        fn patient(&self, id: &str) -> DpsResult<Option<Patient>> {
            Ok(self
                .patients
                .borrow()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        fn add_patient(&self, patient: &Patient) -> DpsResult<()> {
            if self.fail_writes {
                return Err(DpsError::FileWrite(std::io::Error::other("disk full")));
            }
            self.patients.borrow_mut().push(patient.clone());
            Ok(())
        }

        fn update_patient(&self, patient: &Patient) -> DpsResult<()> {
            if self.fail_writes {
                return Err(DpsError::FileWrite(std::io::Error::other("disk full")));
            }
            let mut patients = self.patients.borrow_mut();
            match patients.iter_mut().find(|p| p.id == patient.id) {
                Some(stored) => {
                    *stored = patient.clone();
                    Ok(())
                }
                None => Err(DpsError::UnknownPatient(patient.id.clone())),
            }
        }

        fn header_info(&self) -> DpsResult<HeaderInfo> {
            Ok(HeaderInfo {
                organization: "Poste de secours".into(),
                logo_path: None,
            })
        }

        fn checklist_catalogue(&self) -> DpsResult<Vec<ChecklistCategory>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<(String, Notice)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, severity: Notice) {
            self.messages
                .borrow_mut()
                .push((message.to_string(), severity));
        }
    }

    fn registered_intake() -> PatientIntake {
        PatientIntake {
            bib_number: "204".into(),
            first_name: "Jean".into(),
            last_name: "Petit".into(),
            ..PatientIntake::default()
        }
    }

    #[test]
    fn submit_creates_then_edits_in_place() {
        let service = IntakeService::new(MemoryStore::default(), RecordingNotifier::default());

        let created = service.submit(&registered_intake(), None).expect("create");
        assert_eq!(service.store().patients().unwrap().len(), 1);

        let mut reopened = service.open(Some(&created));
        reopened.team = "SNSM".into();
        let updated = service.submit(&reopened, Some(&created)).expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(service.store().patients().unwrap().len(), 1);
        assert!(updated.circumstances.contains("SNSM"));
    }

    #[test]
    fn store_failure_notifies_once_and_surfaces_error() {
        let store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        let service = IntakeService::new(store, RecordingNotifier::default());

        let err = service.submit(&registered_intake(), None).unwrap_err();
        assert!(matches!(err, DpsError::FileWrite(_)));

        let messages = service.notifier.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, Notice::Error);
    }

    #[test]
    fn set_triage_updates_stored_category() {
        let service = IntakeService::new(MemoryStore::default(), RecordingNotifier::default());
        let created = service.submit(&registered_intake(), None).expect("create");

        let updated = service
            .set_triage(&created.id, TriageCategory::Ua)
            .expect("set triage");
        assert_eq!(updated.triage, Some(TriageCategory::Ua));
        assert_eq!(
            service.store().patient(&created.id).unwrap().unwrap().triage,
            Some(TriageCategory::Ua)
        );
    }

    #[test]
    fn discharge_stamps_exit_time() {
        let service = IntakeService::new(MemoryStore::default(), RecordingNotifier::default());
        let created = service.submit(&registered_intake(), None).expect("create");
        assert!(created.discharged_at.is_none());

        let discharged = service.discharge(&created.id).expect("discharge");
        assert!(discharged.discharged_at.is_some());
        assert_eq!(discharged.triage, created.triage);
    }

    #[test]
    fn operations_on_unknown_ids_notify_and_fail() {
        let service = IntakeService::new(MemoryStore::default(), RecordingNotifier::default());
        let err = service.discharge("missing").unwrap_err();
        assert!(matches!(err, DpsError::UnknownPatient(_)));
        assert_eq!(service.notifier.messages.borrow().len(), 1);
    }
}
