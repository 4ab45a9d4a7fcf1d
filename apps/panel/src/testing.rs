//! Scripted backend shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::availability::SlotQuery;
use crate::error::{PanelError, PanelResult};
use crate::http::{Backend, FormSubmission};
use crate::models::*;

type ErrorFn = fn() -> PanelError;

#[derive(Default)]
pub struct FakeBackend {
    appointments: Option<Vec<Appointment>>,
    working_days: Vec<i64>,
    services: Vec<Service>,
    slots: Vec<String>,
    appointments_error: Option<ErrorFn>,
    working_days_error: Option<ErrorFn>,
    services_error: Option<ErrorFn>,
    slots_error: Option<ErrorFn>,
    submit_error: Option<ErrorFn>,
    calls: Mutex<Calls>,
}

#[derive(Default)]
struct Calls {
    appointments: usize,
    slot_queries: Vec<SlotQuery>,
    submissions: Vec<FormSubmission>,
}

impl FakeBackend {
    pub fn with_appointments(mut self, appointments: Vec<Appointment>) -> Self {
        self.appointments = Some(appointments);
        self
    }

    pub fn with_working_days(mut self, days: &[i64]) -> Self {
        self.working_days = days.to_vec();
        self
    }

    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn with_slots(mut self, slots: Vec<&str>) -> Self {
        self.slots = slots.into_iter().map(String::from).collect();
        self
    }

    pub fn with_appointments_error(mut self, f: ErrorFn) -> Self {
        self.appointments_error = Some(f);
        self
    }

    pub fn with_working_days_error(mut self, f: ErrorFn) -> Self {
        self.working_days_error = Some(f);
        self
    }

    pub fn with_services_error(mut self, f: ErrorFn) -> Self {
        self.services_error = Some(f);
        self
    }

    pub fn with_slots_error(mut self, f: ErrorFn) -> Self {
        self.slots_error = Some(f);
        self
    }

    pub fn with_submit_error(mut self, f: ErrorFn) -> Self {
        self.submit_error = Some(f);
        self
    }

    pub fn appointment_fetches(&self) -> usize {
        self.calls.lock().unwrap().appointments
    }

    pub fn slot_queries(&self) -> Vec<SlotQuery> {
        self.calls.lock().unwrap().slot_queries.clone()
    }

    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.calls.lock().unwrap().submissions.clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_appointments(&self) -> PanelResult<Vec<Appointment>> {
        self.calls.lock().unwrap().appointments += 1;
        if let Some(f) = self.appointments_error {
            return Err(f());
        }
        self.appointments
            .clone()
            .ok_or(PanelError::MissingField("turnos"))
    }

    async fn fetch_working_days(&self) -> PanelResult<WorkingDays> {
        if let Some(f) = self.working_days_error {
            return Err(f());
        }
        Ok(WorkingDays::from_server(&self.working_days))
    }

    async fn fetch_services(&self) -> PanelResult<Vec<Service>> {
        if let Some(f) = self.services_error {
            return Err(f());
        }
        Ok(self.services.clone())
    }

    async fn fetch_available_slots(&self, query: &SlotQuery) -> PanelResult<Vec<String>> {
        self.calls.lock().unwrap().slot_queries.push(query.clone());
        if let Some(f) = self.slots_error {
            return Err(f());
        }
        Ok(self.slots.clone())
    }

    async fn submit_form(&self, form: &FormSubmission) -> PanelResult<()> {
        self.calls.lock().unwrap().submissions.push(form.clone());
        if let Some(f) = self.submit_error {
            return Err(f());
        }
        Ok(())
    }
}

// ── Fixtures ──

pub fn service(id: ServiceId, nombre: &str, color: &str) -> Service {
    Service {
        id,
        nombre: nombre.to_string(),
        color: Some(color.to_string()),
        duracion: 30,
        precio: Some(1500.0),
    }
}

/// Appointment starting at `start` (RFC 3339) and lasting 30 minutes.
pub fn appointment(id: AppointmentId, start: &str, servicio: Service) -> Appointment {
    let inicio: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(start).unwrap();
    Appointment {
        id,
        turno: Slot {
            inicio,
            fin: inicio + chrono::TimeDelta::minutes(30),
            nota: None,
        },
        servicio,
        cliente: Client {
            id: None,
            nombre: Some(format!("Cliente {}", id)),
            contacto: Some("11 5555-5555".to_string()),
        },
    }
}

pub fn art() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}
