//! Available time slots for a (service, date) pair.
//!
//! Create mode asks for every free slot; edit mode names the appointment
//! being edited so the server leaves its own slot out of the conflict check.

use chrono::NaiveDate;

use crate::config::{fill_first, fill_last, Endpoints, DATE_PLACEHOLDER, EXCLUDED_PLACEHOLDER, ID_PLACEHOLDER};
use crate::http::Backend;
use crate::models::{AppointmentId, ServiceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub exclude: Option<AppointmentId>,
}

impl SlotQuery {
    pub fn create(service_id: ServiceId, date: NaiveDate) -> Self {
        Self {
            service_id,
            date,
            exclude: None,
        }
    }

    pub fn edit(service_id: ServiceId, date: NaiveDate, appointment: AppointmentId) -> Self {
        Self {
            service_id,
            date,
            exclude: Some(appointment),
        }
    }

    /// Fill the matching endpoint template. The excluded id goes in first
    /// (last token) so a service id can never land in its place.
    pub fn path(&self, endpoints: &Endpoints) -> String {
        let date = self.date.format("%Y-%m-%d").to_string();
        let template = match self.exclude {
            Some(appointment) => fill_last(
                &endpoints.slots_excluding,
                EXCLUDED_PLACEHOLDER,
                &format!("{}/", appointment),
            ),
            None => endpoints.slots.clone(),
        };
        let with_date = template.replacen(DATE_PLACEHOLDER, &date, 1);
        fill_first(&with_date, ID_PLACEHOLDER, &format!("{}/", self.service_id))
    }
}

/// Fetch the offered times, degrading to an empty list on any failure.
pub async fn fetch_available_slots<B: Backend + ?Sized>(backend: &B, query: &SlotQuery) -> Vec<String> {
    match backend.fetch_available_slots(query).await {
        Ok(times) => times,
        Err(e) => {
            tracing::error!(
                kind = ?e.kind(),
                "Error cargando horarios (servicio {}, fecha {}): {}",
                query.service_id,
                query.date,
                e
            );
            Vec::new()
        }
    }
}
