use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

pub type AppointmentId = i64;
pub type ServiceId = i64;

/// Color the calendar widget paints events with when a service has none.
pub const DEFAULT_SERVICE_COLOR: &str = "#3788d8";

// ── Domain records ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub nombre: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Minutes.
    pub duracion: u32,
    #[serde(default)]
    pub precio: Option<f64>,
}

impl Service {
    pub fn color_or_default(&self) -> &str {
        self.color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_SERVICE_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub inicio: DateTime<FixedOffset>,
    pub fin: DateTime<FixedOffset>,
    #[serde(default)]
    pub nota: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Present when the client booked through their own account.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub contacto: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub turno: Slot,
    pub servicio: Service,
    pub cliente: Client,
}

impl Appointment {
    /// Self-booked appointments keep client data read-only.
    pub fn is_self_booked(&self) -> bool {
        self.cliente.id.is_some()
    }

    pub fn local_start(&self, offset: &FixedOffset) -> DateTime<FixedOffset> {
        self.turno.inicio.with_timezone(offset)
    }

    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.local_start(offset).date_naive()
    }

    /// Start time as `HH:MM`, the format the availability endpoint speaks.
    pub fn local_hhmm(&self, offset: &FixedOffset) -> String {
        self.local_start(offset).format("%H:%M").to_string()
    }

    pub fn client_name(&self) -> &str {
        self.cliente.nombre.as_deref().unwrap_or("")
    }
}

// ── Working days ──

/// Weekdays the business works, Monday = 0 .. Sunday = 6.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingDays(BTreeSet<u8>);

impl WorkingDays {
    /// Keep only valid weekday numbers; the server should never send others.
    pub fn from_server(days: &[i64]) -> Self {
        let mut set = BTreeSet::new();
        for &d in days {
            match u8::try_from(d) {
                Ok(day) if day <= 6 => {
                    set.insert(day);
                }
                _ => tracing::warn!("Día trabajado inválido ignorado: {}", d),
            }
        }
        Self(set)
    }

    pub fn contains(&self, server_day: u8) -> bool {
        self.0.contains(&server_day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Whether a calendar date falls on a working day.
    pub fn allows(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday().num_days_from_monday() as u8)
    }

    /// Same check for a picker that numbers days Sunday = 0.
    pub fn accepts_picker_day(&self, picker_day: u32) -> bool {
        self.contains(picker_day_to_server(picker_day))
    }
}

/// Picker convention (Sunday = 0) to server convention (Monday = 0).
pub fn picker_day_to_server(picker_day: u32) -> u8 {
    ((picker_day % 7 + 6) % 7) as u8
}

// ── Response envelopes ──
//
// The expected field is optional so that a body lacking it is reported as a
// payload-shape failure instead of a decode error.

#[derive(Debug, Deserialize)]
pub struct AppointmentsPayload {
    pub turnos: Option<Vec<Appointment>>,
}

#[derive(Debug, Deserialize)]
pub struct WorkingDaysPayload {
    pub dias_trabajados: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct ServicesPayload {
    pub servicios: Option<Vec<Service>>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsPayload {
    pub horarios_disponibles: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorPayload {
    pub error: Option<String>,
}
