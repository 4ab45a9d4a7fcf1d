//! The appointment collection shared by the calendar, the agenda and the form.

use crate::error::{PanelError, PanelResult};
use crate::http::Backend;
use crate::models::{Appointment, AppointmentId};

#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    loaded: Option<Vec<Appointment>>,
}

impl AppointmentBook {
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn appointments(&self) -> &[Appointment] {
        self.loaded.as_deref().unwrap_or(&[])
    }

    /// Fetch the collection and keep it. Failures yield (and keep) nothing,
    /// so the next lookup tries the server again.
    pub async fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> &[Appointment] {
        match backend.fetch_appointments().await {
            Ok(appointments) => {
                tracing::info!("Cargados {} turnos", appointments.len());
                self.loaded = Some(appointments);
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "Error al obtener los turnos: {}", e);
                self.loaded = None;
            }
        }
        self.appointments()
    }

    /// Look an appointment up in memory, fetching the collection first when
    /// no reader has loaded it yet.
    pub async fn find<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        id: AppointmentId,
    ) -> PanelResult<Appointment> {
        if !self.is_loaded() {
            tracing::warn!("Turnos todavía sin cargar, se piden para buscar el {}", id);
            self.refresh(backend).await;
        }
        self.appointments()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(PanelError::AppointmentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{appointment, service, FakeBackend};

    fn sample() -> Vec<Appointment> {
        vec![
            appointment(1, "2024-01-01T09:00:00-03:00", service(1, "Corte", "#000000")),
            appointment(2, "2024-01-02T09:00:00-03:00", service(1, "Corte", "#000000")),
        ]
    }

    #[tokio::test]
    async fn test_find_fetches_when_unloaded() {
        let backend = FakeBackend::default().with_appointments(sample());
        let mut book = AppointmentBook::default();
        let found = book.find(&backend, 2).await.unwrap();
        assert_eq!(found.id, 2);
        assert_eq!(backend.appointment_fetches(), 1);

        // Second lookup stays in memory
        book.find(&backend, 1).await.unwrap();
        assert_eq!(backend.appointment_fetches(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_is_lookup_failure() {
        let backend = FakeBackend::default().with_appointments(sample());
        let mut book = AppointmentBook::default();
        let err = book.find(&backend, 99).await.unwrap_err();
        assert!(matches!(err, PanelError::AppointmentNotFound(99)));
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_unloaded() {
        let backend = FakeBackend::default().with_appointments_error(|| PanelError::status(500, None));
        let mut book = AppointmentBook::default();
        assert!(book.refresh(&backend).await.is_empty());
        assert!(!book.is_loaded());
        assert!(book.find(&backend, 1).await.is_err());
        assert_eq!(backend.appointment_fetches(), 2);
    }
}
