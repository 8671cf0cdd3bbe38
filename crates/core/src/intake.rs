//! Structured intake form state.
//!
//! A [`PatientIntake`] exists only while one intake form session is open: it
//! is built by decoding an existing [`crate::Patient`] (edit) or defaulted
//! (create), mutated by the caller, and discharged back into a `Patient`
//! through [`crate::codec::encode`] on submit.

/// Patient sex as recorded on the intake form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    /// Wire label stored on the patient record.
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    /// Parse from the stored label; anything unrecognised falls back to the
    /// default. The decoder must never fail on malformed records.
    pub fn from_stored(s: &str) -> Self {
        match s.trim() {
            "F" => Sex::Female,
            _ => Sex::Male,
        }
    }
}

/// Consciousness state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Consciousness {
    #[default]
    Conscious,
    Unconscious,
}

impl Consciousness {
    pub fn as_str(self) -> &'static str {
        match self {
            Consciousness::Conscious => "Conscient",
            Consciousness::Unconscious => "Inconscient",
        }
    }

    pub fn from_stored(s: &str) -> Self {
        match s.trim() {
            "Inconscient" => Consciousness::Unconscious,
            _ => Consciousness::Conscious,
        }
    }
}

/// Respiration state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Respiration {
    #[default]
    Normal,
    Fast,
    Slow,
    Absent,
}

impl Respiration {
    pub fn as_str(self) -> &'static str {
        match self {
            Respiration::Normal => "Normale",
            Respiration::Fast => "Rapide",
            Respiration::Slow => "Lente",
            Respiration::Absent => "Absente",
        }
    }

    pub fn from_stored(s: &str) -> Self {
        match s.trim() {
            "Rapide" => Respiration::Fast,
            "Lente" => Respiration::Slow,
            "Absente" => Respiration::Absent,
            _ => Respiration::Normal,
        }
    }
}

/// Pulse state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PulseState {
    #[default]
    Normal,
    Fast,
    Slow,
    Thready,
    Absent,
}

impl PulseState {
    pub fn as_str(self) -> &'static str {
        match self {
            PulseState::Normal => "Normal",
            PulseState::Fast => "Rapide",
            PulseState::Slow => "Lent",
            PulseState::Thready => "Filant",
            PulseState::Absent => "Absent",
        }
    }

    pub fn from_stored(s: &str) -> Self {
        match s.trim() {
            "Rapide" => PulseState::Fast,
            "Lent" => PulseState::Slow,
            "Filant" => PulseState::Thready,
            "Absent" => PulseState::Absent,
            _ => PulseState::Normal,
        }
    }
}

/// Disposition decided at the end of the intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The patient resumes the activity.
    ResumeActivity,
    /// The patient stays under surveillance at the post.
    OnSiteSurveillance,
    /// The patient is evacuated to a medical facility.
    Evacuation,
}

impl Disposition {
    /// Label written inside the `[Décision: …]` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::ResumeActivity => "Reprise d'activité",
            Disposition::OnSiteSurveillance => "Surveillance sur place",
            Disposition::Evacuation => "Évacuation médicale",
        }
    }

    /// Parse from the tag label; unknown labels yield `None` (no decision).
    pub fn from_stored(s: &str) -> Option<Self> {
        match s.trim() {
            "Reprise d'activité" => Some(Disposition::ResumeActivity),
            "Surveillance sur place" => Some(Disposition::OnSiteSurveillance),
            "Évacuation médicale" => Some(Disposition::Evacuation),
            _ => None,
        }
    }
}

/// Means of evacuation, meaningful only under [`Disposition::Evacuation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvacuationMeans {
    Ambulance,
    MedicalizedVehicle,
    Helicopter,
}

impl EvacuationMeans {
    pub fn as_str(self) -> &'static str {
        match self {
            EvacuationMeans::Ambulance => "Ambulance",
            EvacuationMeans::MedicalizedVehicle => "Véhicule médicalisé",
            EvacuationMeans::Helicopter => "Hélicoptère",
        }
    }

    pub fn from_stored(s: &str) -> Option<Self> {
        match s.trim() {
            "Ambulance" => Some(EvacuationMeans::Ambulance),
            "Véhicule médicalisé" => Some(EvacuationMeans::MedicalizedVehicle),
            "Hélicoptère" => Some(EvacuationMeans::Helicopter),
            _ => None,
        }
    }
}

/// Structured state of one intake form session.
///
/// All vital signs are carried as free text: the post staff record whatever
/// they measured, and no numeric validation is enforced at this layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientIntake {
    /// Race bib number, may be empty.
    pub bib_number: String,
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    /// Free text; ranges like "40-45" are common.
    pub age: String,
    /// Team or club affiliation.
    pub team: String,

    /// Selected incident mechanism categories. Entries outside the fixed
    /// option list are accepted and preserved as freeform.
    pub mechanisms: Vec<String>,
    /// Free-text narrative of the incident.
    pub mechanism_narrative: String,

    pub consciousness: Consciousness,
    pub glasgow: String,
    pub respiration: Respiration,
    pub pulse: PulseState,
    /// Pain scale 0-10, unvalidated free text.
    pub pain_scale: String,
    pub systolic: String,
    pub diastolic: String,
    pub heart_rate: String,
    pub respiratory_rate: String,
    pub spo2: String,
    pub temperature: String,
    pub glycemia: String,

    /// Selected care action categories.
    pub care_actions: Vec<String>,
    /// Free-text clinical observations, without any packing tags.
    pub observation_narrative: String,

    /// Disposition decision, `None` while undecided.
    pub disposition: Option<Disposition>,
    pub evacuation_means: Option<EvacuationMeans>,
    pub evacuation_destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_through_stored_labels() {
        for state in [
            Respiration::Normal,
            Respiration::Fast,
            Respiration::Slow,
            Respiration::Absent,
        ] {
            assert_eq!(Respiration::from_stored(state.as_str()), state);
        }
        for state in [
            PulseState::Normal,
            PulseState::Fast,
            PulseState::Slow,
            PulseState::Thready,
            PulseState::Absent,
        ] {
            assert_eq!(PulseState::from_stored(state.as_str()), state);
        }
        for disposition in [
            Disposition::ResumeActivity,
            Disposition::OnSiteSurveillance,
            Disposition::Evacuation,
        ] {
            assert_eq!(
                Disposition::from_stored(disposition.as_str()),
                Some(disposition)
            );
        }
    }

    #[test]
    fn unrecognised_labels_fall_back_to_defaults() {
        assert_eq!(Consciousness::from_stored("???"), Consciousness::Conscious);
        assert_eq!(Respiration::from_stored(""), Respiration::Normal);
        assert_eq!(PulseState::from_stored("weird"), PulseState::Normal);
        assert_eq!(Disposition::from_stored("weird"), None);
    }
}
