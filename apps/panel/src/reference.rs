//! Page-lifetime reference data: working days and offered services.
//!
//! Loaded once at start-up and never refreshed. Failures degrade to empty
//! sets, which leaves nothing selectable instead of aborting the page.

use crate::http::Backend;
use crate::models::{Service, ServiceId, WorkingDays};

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub working_days: WorkingDays,
    pub services: Vec<Service>,
}

impl ReferenceData {
    /// Working days first, then services, the order the date picker needs them in.
    pub async fn load<B: Backend + ?Sized>(backend: &B) -> Self {
        let working_days = load_working_days(backend).await;
        let services = load_services(backend).await;
        Self {
            working_days,
            services,
        }
    }

    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}

pub async fn load_working_days<B: Backend + ?Sized>(backend: &B) -> WorkingDays {
    match backend.fetch_working_days().await {
        Ok(days) => {
            tracing::info!("Días trabajados: {:?}", days.days().collect::<Vec<_>>());
            if days.is_empty() {
                tracing::warn!("Sin días trabajados, ninguna fecha va a ser seleccionable");
            }
            days
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "Error al obtener días trabajados: {}", e);
            WorkingDays::default()
        }
    }
}

pub async fn load_services<B: Backend + ?Sized>(backend: &B) -> Vec<Service> {
    match backend.fetch_services().await {
        Ok(services) => {
            tracing::info!("Cargados {} servicios", services.len());
            services
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "Error al obtener servicios: {}", e);
            Vec::new()
        }
    }
}
