//! In-memory implementation of the appointment store gateway.
//!
//! Backing tables are plain `BTreeMap`s keyed by id, mirroring the source
//! EHR schema at a small scale. The store is read-only after construction
//! except for the `set_offline` toggle, which simulates a database outage
//! for failure-path testing and demos.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;

use noshow_contracts::{
    appointment::{Appointment, AppointmentRecord, AppointmentStatus, Department, Provider},
    error::{EngineError, EngineResult},
    forecast::DateRange,
    ids::{AppointmentId, DepartmentId, PatientId, ProviderId},
    patient::{OutcomeRecord, Patient},
};
use noshow_core::traits::AppointmentStore;

/// An in-memory clinic database.
#[derive(Default)]
pub struct InMemoryClinicStore {
    patients: BTreeMap<PatientId, Patient>,
    providers: BTreeMap<ProviderId, Provider>,
    departments: BTreeMap<DepartmentId, Department>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    history: HashMap<PatientId, Vec<OutcomeRecord>>,
    offline: AtomicBool,
}

impl InMemoryClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&mut self, patient: Patient) {
        self.patients.insert(patient.id, patient);
    }

    pub fn add_provider(&mut self, provider: Provider) {
        self.providers.insert(provider.id, provider);
    }

    pub fn add_department(&mut self, department: Department) {
        self.departments.insert(department.id, department);
    }

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.insert(appointment.id, appointment);
    }

    /// Append historical outcomes for a patient, oldest first.
    pub fn add_outcomes(&mut self, patient_id: PatientId, outcomes: Vec<OutcomeRecord>) {
        self.history.entry(patient_id).or_default().extend(outcomes);
    }

    /// Simulate the backing database going down. While offline every query
    /// fails with `DataUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> EngineResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(EngineError::DataUnavailable {
                reason: "clinic database offline".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Join one appointment with its patient, provider, and department rows.
    fn join(&self, appointment: &Appointment) -> EngineResult<AppointmentRecord> {
        let patient = self
            .patients
            .get(&appointment.patient_id)
            .ok_or_else(|| EngineError::not_found("patient", appointment.patient_id))?;
        let provider = self
            .providers
            .get(&appointment.provider_id)
            .ok_or_else(|| EngineError::not_found("provider", appointment.provider_id))?;
        let department = self
            .departments
            .get(&appointment.department_id)
            .ok_or_else(|| EngineError::not_found("department", appointment.department_id))?;

        Ok(AppointmentRecord {
            appointment: appointment.clone(),
            patient: patient.clone(),
            provider: provider.clone(),
            department: department.clone(),
        })
    }
}

impl AppointmentStore for InMemoryClinicStore {
    fn fetch_appointments(&self, range: DateRange) -> EngineResult<Vec<AppointmentRecord>> {
        self.check_online()?;

        let mut records: Vec<AppointmentRecord> = self
            .appointments
            .values()
            .filter(|a| range.contains(a.date()))
            .map(|a| self.join(a))
            .collect::<EngineResult<_>>()?;

        records.sort_by_key(|r| (r.appointment.start, r.appointment.id));
        Ok(records)
    }

    fn fetch_appointment(&self, id: AppointmentId) -> EngineResult<AppointmentRecord> {
        self.check_online()?;
        let appointment = self
            .appointments
            .get(&id)
            .ok_or_else(|| EngineError::not_found("appointment", id))?;
        self.join(appointment)
    }

    fn fetch_patient(&self, id: PatientId) -> EngineResult<Patient> {
        self.check_online()?;
        self.patients
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("patient", id))
    }

    fn fetch_history(&self, id: PatientId) -> EngineResult<Vec<OutcomeRecord>> {
        self.check_online()?;
        Ok(self.history.get(&id).cloned().unwrap_or_default())
    }

    fn fetch_next_appointment(
        &self,
        id: PatientId,
        on_or_after: NaiveDate,
    ) -> EngineResult<Option<AppointmentRecord>> {
        self.check_online()?;
        let next = self
            .appointments
            .values()
            .filter(|a| {
                a.patient_id == id
                    && a.status == AppointmentStatus::Scheduled
                    && a.date() >= on_or_after
            })
            .min_by_key(|a| (a.start, a.id));

        next.map(|a| self.join(a)).transpose()
    }
}
