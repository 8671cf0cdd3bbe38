//! Fixed option lists and wire literals shared across the crate.
//!
//! The text conventions here are load-bearing: the intake codec packs
//! structured fields into the `circumstances` and `observations` strings
//! using these exact literals, and the decoder depends on them to recover
//! the structure. Change them and existing records stop decoding.

/// Directory under the data dir holding sharded patient records.
pub const PATIENTS_DIR_NAME: &str = "patients";

/// Default station config file name, resolved relative to the data dir.
pub const STATION_FILE_NAME: &str = "station.yaml";

/// Placeholder stored as the first name when none was entered and the
/// patient carries no bib number.
pub const UNKNOWN_FIRST_NAME: &str = "Inconnu";

/// Placeholder stored as the last name when none was entered.
pub const DEFAULT_LAST_NAME: &str = "Participant";

/// Chief complaint recorded when no incident mechanism was selected.
pub const FALLBACK_COMPLAINT: &str = "Non précisé";

/// Marker substring counted by the triage summary as a pending evacuation.
pub const EVACUATION_MARKER: &str = "Évacuation";

/// Key of the team segment inside `circumstances`.
pub const TEAM_KEY: &str = "Team";

/// Key of the mechanism segment inside `circumstances`.
pub const MECHANISM_KEY: &str = "Meca";

/// Key of the care-actions tag inside `observations`.
pub const CARE_TAG_KEY: &str = "Soins";

/// Key of the disposition tag inside `observations`.
pub const DECISION_TAG_KEY: &str = "Décision";

/// Incident mechanism categories offered by the intake form. Free-text
/// entries outside this list are accepted and preserved by the codec.
pub const MECHANISM_OPTIONS: &[&str] = &[
    "Chute",
    "Malaise",
    "Traumatisme",
    "Plaie",
    "Brûlure",
    "Hyperthermie",
    "Hypothermie",
    "Douleur thoracique",
    "Crampes",
];

/// Care action categories offered by the intake form.
pub const CARE_ACTION_OPTIONS: &[&str] = &[
    "Glace",
    "Immobilisation",
    "Pansement",
    "Oxygène",
    "Position d'attente",
    "Surveillance",
    "Réhydratation",
];
