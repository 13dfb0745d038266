//! Command handlers.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use care_collect_core::models::compute_bmi;
use care_collect_core::{
    Condition, Database, HealthHistory, Locality, Patient, PatientFields, RecordStore, Vitals,
};

use crate::cli::{CliArgs, Command, LookupArgs, PatientArgs, VitalsArgs};
use crate::settings::Settings;

/// Load settings, open the store and run one command.
pub fn run(args: CliArgs) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let db_path = args.db.unwrap_or(settings.database_path);

    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;
    let mut store = RecordStore::with_policy(db, settings.id_policy)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&mut store, args.command, &mut out)
}

/// Run one command against an open store.
pub fn execute<W: Write>(store: &mut RecordStore, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Add(patient) => {
            let fields = patient.apply_to(PatientFields::default())?;
            let patient = store.upsert_patient(fields, None)?;
            writeln!(out, "Added patient {} ({})", patient.id, patient.name)?;
        }
        Command::Edit {
            patient_id,
            patient,
        } => {
            let current = store
                .get(&patient_id)
                .map(Patient::to_fields)
                .ok_or_else(|| anyhow!("no patient with ID {}", patient_id))?;
            let fields = patient.apply_to(current)?;
            let patient = store.upsert_patient(fields, Some(&patient_id))?;
            writeln!(out, "Updated patient {} ({})", patient.id, patient.name)?;
        }
        Command::Delete { id } => {
            if store.delete_patient(&id)? {
                writeln!(out, "Deleted patient {}", id)?;
            } else {
                writeln!(out, "No patient with ID {}", id)?;
            }
        }
        Command::List => write_table(out, store.patients().iter())?,
        Command::Search { query } => write_table(out, store.search(&query).into_iter())?,
        Command::Show(lookup) => {
            let patient = resolve(store, &lookup)?;
            write_details(out, &patient)?;
        }
        Command::Visit { lookup, vitals } => {
            let patient = resolve(store, &lookup)?;
            let visit = store.record_visit(&patient.id, vitals.into())?;
            writeln!(
                out,
                "Recorded visit for {} ({}) at {}",
                patient.name, patient.id, visit.date
            )?;
        }
        Command::Bmi { height, weight } => {
            let bmi = compute_bmi(&height, &weight);
            if bmi.is_empty() {
                bail!("height and weight must both be positive numbers");
            }
            writeln!(out, "{}", bmi)?;
        }
    }
    Ok(())
}

fn resolve(store: &mut RecordStore, lookup: &LookupArgs) -> Result<Patient> {
    match (&lookup.id, &lookup.name) {
        (Some(id), _) => Ok(store.find_patient_by_id(id)?),
        (None, Some(name)) => {
            let patient = store.find_patient_by_name(name)?;
            let matches = store.find_patients_by_name(name).len();
            if matches > 1 {
                log::warn!(
                    "{} patients match {:?}; using {} ({})",
                    matches,
                    name,
                    patient.id,
                    patient.name
                );
            }
            Ok(patient)
        }
        (None, None) => bail!("either --id or --name is required"),
    }
}

fn write_table<'a, W: Write>(
    out: &mut W,
    patients: impl Iterator<Item = &'a Patient>,
) -> Result<()> {
    writeln!(out, "ID\tNAME\tAGE\tSEX\tLOCALITY\tCONTACT\tBMI\tHISTORY")?;
    for p in patients {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            p.id,
            p.name,
            p.age,
            p.sex,
            p.locality.describe(),
            p.contact,
            p.bmi,
            p.health_history.to_display_string()
        )?;
    }
    Ok(())
}

fn write_details<W: Write>(out: &mut W, p: &Patient) -> Result<()> {
    writeln!(out, "ID:             {}", p.id)?;
    writeln!(out, "Name:           {}", p.name)?;
    writeln!(out, "Age:            {}", p.age)?;
    writeln!(out, "Sex:            {}", p.sex)?;
    match &p.locality {
        Locality::Barangay { barangay } => writeln!(out, "Barangay:       {}", barangay)?,
        Locality::Campus { program, year } => {
            writeln!(out, "Program:        {}", program)?;
            writeln!(out, "Year Level:     {}", year)?;
        }
    }
    writeln!(out, "Contact:        {}", p.contact)?;
    writeln!(out, "BMI:            {}", p.bmi)?;
    writeln!(out, "Health History: {}", p.health_history.to_display_string())?;

    if p.visits.is_empty() {
        writeln!(out, "No visit records yet.")?;
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "DATE\tBP\tTEMP\tPR\tRR\tO2\tCOMPLAINT")?;
    for v in &p.visits {
        let vitals = &v.vitals;
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            v.date, vitals.bp, vitals.temp, vitals.pr, vitals.rr, vitals.oxygen, vitals.complaint
        )?;
    }
    Ok(())
}

impl PatientArgs {
    /// Overlay the given attributes on `base`, rejecting unknown condition
    /// names. Omitted attributes keep their `base` values.
    pub fn apply_to(self, base: PatientFields) -> Result<PatientFields> {
        let mut conditions = Vec::new();
        for label in self.conditions.iter().filter(|l| !l.trim().is_empty()) {
            match Condition::from_label(label) {
                Some(condition) => conditions.push(condition),
                None => bail!(
                    "unknown condition {:?} (known: {})",
                    label,
                    Condition::ALL
                        .iter()
                        .map(|c| c.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        }

        let locality = match (self.barangay, self.program, self.year, base.locality) {
            (Some(barangay), _, _, _) => Locality::barangay(barangay),
            (None, None, None, current) => current,
            (None, program, year, Locality::Campus { program: p, year: y }) => {
                Locality::campus(program.unwrap_or(p), year.unwrap_or(y))
            }
            (None, program, year, Locality::Barangay { .. }) => {
                Locality::campus(program.unwrap_or_default(), year.unwrap_or_default())
            }
        };

        // `--history ""` clears the conditions; omitting it keeps them.
        let history = &base.health_history;
        let health_history = match (self.conditions.is_empty(), self.other_history) {
            (true, None) => base.health_history.clone(),
            (true, other) => HealthHistory::new(history.conditions().iter().copied(), other),
            (false, other) => HealthHistory::new(
                conditions,
                other.or_else(|| history.other().map(str::to_string)),
            ),
        };

        Ok(PatientFields {
            id: self.id.or(base.id),
            name: self.name.unwrap_or(base.name),
            age: self.age.unwrap_or(base.age),
            sex: self.sex.unwrap_or(base.sex),
            locality,
            contact: self.contact.unwrap_or(base.contact),
            height: self.height.unwrap_or(base.height),
            weight: self.weight.unwrap_or(base.weight),
            health_history,
        })
    }
}

impl From<VitalsArgs> for Vitals {
    fn from(v: VitalsArgs) -> Self {
        Vitals {
            bp: v.bp,
            temp: v.temp,
            pr: v.pr,
            rr: v.rr,
            oxygen: v.oxygen,
            complaint: v.complaint,
        }
    }
}
