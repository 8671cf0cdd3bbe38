use clap::{Parser, Subcommand};
use dps_core::checklist::ChecklistSession;
use dps_core::constants::{CARE_ACTION_OPTIONS, MECHANISM_OPTIONS};
use dps_core::intake::{Consciousness, Disposition, EvacuationMeans, PulseState, Respiration, Sex};
use dps_core::notify::TracingNotifier;
use dps_core::report::ReportExporter;
use dps_core::service::IntakeService;
use dps_core::store::{JsonPatientStore, PatientStore};
use dps_core::triage::{active_list, TriageSummary};
use dps_core::{CoreConfig, PatientIntake, TriageCategory};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dps")]
#[command(about = "DPS first-aid post triage and patient tracking")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new patient through the intake form
    Register {
        /// Race bib number (dossard)
        #[arg(long)]
        bib: Option<String>,
        /// First name
        #[arg(long)]
        first_name: Option<String>,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
        /// Sex: m or f
        #[arg(long)]
        sex: Option<String>,
        /// Age (free text)
        #[arg(long)]
        age: Option<String>,
        /// Team or club affiliation
        #[arg(long)]
        team: Option<String>,
        /// Incident mechanism category (repeatable)
        #[arg(long = "mechanism")]
        mechanisms: Vec<String>,
        /// Incident narrative
        #[arg(long)]
        note: Option<String>,
        /// The patient is unconscious
        #[arg(long)]
        unconscious: bool,
        /// Glasgow score
        #[arg(long)]
        glasgow: Option<String>,
        /// Respiration: normale, rapide, lente or absente
        #[arg(long)]
        respiration: Option<String>,
        /// Pulse: normal, rapide, lent, filant or absent
        #[arg(long)]
        pulse: Option<String>,
        /// Pain scale 0-10
        #[arg(long)]
        pain: Option<String>,
        /// Systolic pressure
        #[arg(long)]
        systolic: Option<String>,
        /// Diastolic pressure
        #[arg(long)]
        diastolic: Option<String>,
        /// Heart rate
        #[arg(long)]
        heart_rate: Option<String>,
        /// Respiratory rate
        #[arg(long)]
        respiratory_rate: Option<String>,
        /// SpO2
        #[arg(long)]
        spo2: Option<String>,
        /// Temperature
        #[arg(long)]
        temperature: Option<String>,
        /// Glycemia
        #[arg(long)]
        glycemia: Option<String>,
        /// Care action category (repeatable)
        #[arg(long = "care")]
        cares: Vec<String>,
        /// Clinical observations
        #[arg(long)]
        observation: Option<String>,
        /// Decision: reprise, surveillance or evacuation
        #[arg(long)]
        decision: Option<String>,
        /// Evacuation means: ambulance, vehicule or helicoptere
        #[arg(long)]
        means: Option<String>,
        /// Evacuation destination
        #[arg(long)]
        destination: Option<String>,
    },
    /// Show the active triage list in board order
    List,
    /// Show aggregate counts per triage category
    Summary,
    /// Change the triage severity of a patient
    Triage {
        /// Patient record id
        id: String,
        /// Category: UA, UR, UIMP or DCD
        category: TriageCategory,
    },
    /// Discharge a patient (stamp the exit time)
    Discharge {
        /// Patient record id
        id: String,
    },
    /// Export the printable patient sheet
    Report {
        /// Patient record id
        id: String,
        /// Output directory for the sheet
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
    },
    /// Show the equipment-readiness checklist catalogue
    Checklist,
    /// Show the fixed intake option lists (mechanisms and care actions)
    Options,
}

fn parse_sex(value: &str) -> Option<Sex> {
    match value.to_lowercase().as_str() {
        "m" | "h" => Some(Sex::Male),
        "f" => Some(Sex::Female),
        _ => None,
    }
}

fn parse_respiration(value: &str) -> Option<Respiration> {
    match value.to_lowercase().as_str() {
        "normale" => Some(Respiration::Normal),
        "rapide" => Some(Respiration::Fast),
        "lente" => Some(Respiration::Slow),
        "absente" => Some(Respiration::Absent),
        _ => None,
    }
}

fn parse_pulse(value: &str) -> Option<PulseState> {
    match value.to_lowercase().as_str() {
        "normal" => Some(PulseState::Normal),
        "rapide" => Some(PulseState::Fast),
        "lent" => Some(PulseState::Slow),
        "filant" => Some(PulseState::Thready),
        "absent" => Some(PulseState::Absent),
        _ => None,
    }
}

fn parse_decision(value: &str) -> Option<Disposition> {
    match value.to_lowercase().as_str() {
        "reprise" => Some(Disposition::ResumeActivity),
        "surveillance" => Some(Disposition::OnSiteSurveillance),
        "evacuation" => Some(Disposition::Evacuation),
        _ => None,
    }
}

fn parse_means(value: &str) -> Option<EvacuationMeans> {
    match value.to_lowercase().as_str() {
        "ambulance" => Some(EvacuationMeans::Ambulance),
        "vehicule" => Some(EvacuationMeans::MedicalizedVehicle),
        "helicoptere" => Some(EvacuationMeans::Helicopter),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let data_dir = std::env::var("DPS_DATA_DIR").unwrap_or_else(|_| "dps_data".into());
    let station_file = std::env::var("DPS_STATION_FILE").ok().map(PathBuf::from);
    let cfg = Arc::new(CoreConfig::new(PathBuf::from(data_dir), station_file)?);

    let store = JsonPatientStore::new(cfg);
    let service = IntakeService::new(store, TracingNotifier);

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Register {
            bib,
            first_name,
            last_name,
            sex,
            age,
            team,
            mechanisms,
            note,
            unconscious,
            glasgow,
            respiration,
            pulse,
            pain,
            systolic,
            diastolic,
            heart_rate,
            respiratory_rate,
            spo2,
            temperature,
            glycemia,
            cares,
            observation,
            decision,
            means,
            destination,
        }) => {
            let intake = PatientIntake {
                bib_number: bib.unwrap_or_default(),
                first_name: first_name.unwrap_or_default(),
                last_name: last_name.unwrap_or_default(),
                sex: sex.as_deref().and_then(parse_sex).unwrap_or_default(),
                age: age.unwrap_or_default(),
                team: team.unwrap_or_default(),
                mechanisms,
                mechanism_narrative: note.unwrap_or_default(),
                consciousness: if unconscious {
                    Consciousness::Unconscious
                } else {
                    Consciousness::Conscious
                },
                glasgow: glasgow.unwrap_or_default(),
                respiration: respiration
                    .as_deref()
                    .and_then(parse_respiration)
                    .unwrap_or_default(),
                pulse: pulse.as_deref().and_then(parse_pulse).unwrap_or_default(),
                pain_scale: pain.unwrap_or_default(),
                systolic: systolic.unwrap_or_default(),
                diastolic: diastolic.unwrap_or_default(),
                heart_rate: heart_rate.unwrap_or_default(),
                respiratory_rate: respiratory_rate.unwrap_or_default(),
                spo2: spo2.unwrap_or_default(),
                temperature: temperature.unwrap_or_default(),
                glycemia: glycemia.unwrap_or_default(),
                care_actions: cares,
                observation_narrative: observation.unwrap_or_default(),
                disposition: decision.as_deref().and_then(parse_decision),
                evacuation_means: means.as_deref().and_then(parse_means),
                evacuation_destination: destination.unwrap_or_default(),
            };

            match service.submit(&intake, None) {
                Ok(patient) => println!("Registered patient with id: {}", patient.id),
                Err(e) => eprintln!("Error registering patient: {}", e),
            }
        }
        Some(Commands::List) => {
            let patients = service.store().patients()?;
            let active = active_list(&patients);
            if active.is_empty() {
                println!("No active patients.");
            } else {
                for patient in active {
                    let category = patient
                        .triage
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".into());
                    let admitted = patient
                        .admission_or_creation()
                        .format("%H:%M")
                        .to_string();
                    println!(
                        "{:<5} {:<6} {} {} (admitted {}, id {})",
                        category,
                        patient.bib_number,
                        patient.last_name,
                        patient.first_name,
                        admitted,
                        patient.id
                    );
                }
            }
        }
        Some(Commands::Summary) => {
            let patients = service.store().patients()?;
            let summary = TriageSummary::of(&patients);
            println!("UA: {}", summary.ua);
            println!("UR: {}", summary.ur);
            println!("UIMP: {}", summary.uimp);
            println!("DCD: {}", summary.deceased);
            println!("Untriaged: {}", summary.untriaged);
            println!("Evacuations: {}", summary.evacuations);
            println!("Total active: {}", summary.total());
        }
        Some(Commands::Triage { id, category }) => match service.set_triage(&id, category) {
            Ok(patient) => println!("Patient {} set to {}", patient.id, category),
            Err(e) => eprintln!("Error changing triage: {}", e),
        },
        Some(Commands::Discharge { id }) => match service.discharge(&id) {
            Ok(patient) => println!("Discharged patient {}", patient.id),
            Err(e) => eprintln!("Error discharging patient: {}", e),
        },
        Some(Commands::Report { id, out_dir }) => {
            let Some(patient) = service.store().patient(&id)? else {
                eprintln!("Unknown patient: {}", id);
                return Ok(());
            };
            let header = service.store().header_info()?;
            let exporter = ReportExporter::new(out_dir);
            match exporter.export(&header, &patient) {
                Some(path) => println!("Wrote report: {}", path.display()),
                None => eprintln!("Report export failed or already running"),
            }
        }
        Some(Commands::Checklist) => {
            let catalogue = service.store().checklist_catalogue()?;
            if catalogue.is_empty() {
                println!("No checklist configured.");
            } else {
                let session = ChecklistSession::new(catalogue);
                for category in session.categories() {
                    let (done, total) = session.progress(&category.name).unwrap_or((0, 0));
                    println!("{} ({}/{})", category.name, done, total);
                    for item in &category.items {
                        println!("  [ ] {}", item);
                    }
                }
            }
        }
        Some(Commands::Options) => {
            println!("Mechanism categories:");
            for option in MECHANISM_OPTIONS {
                println!("  {}", option);
            }
            println!("Care actions:");
            for option in CARE_ACTION_OPTIONS {
                println!("  {}", option);
            }
        }
        None => {
            println!("Use 'dps --help' for commands");
        }
    }

    Ok(())
}
