//! HTTP boundary with the scheduling server.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::availability::SlotQuery;
use crate::config::{Endpoints, PanelConfig};
use crate::error::{PanelError, PanelResult};
use crate::models::*;

/// A browser-equivalent form post: action path plus the successful controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Everything the panel needs from the server.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_appointments(&self) -> PanelResult<Vec<Appointment>>;
    async fn fetch_working_days(&self) -> PanelResult<WorkingDays>;
    async fn fetch_services(&self) -> PanelResult<Vec<Service>>;
    async fn fetch_available_slots(&self, query: &SlotQuery) -> PanelResult<Vec<String>>;
    async fn submit_form(&self, form: &FormSubmission) -> PanelResult<()>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(config: &PanelConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        if let Some(cookie) = &config.session_cookie {
            let mut value = HeaderValue::from_str(cookie)
                .map_err(|_| anyhow::anyhow!("TURNOS_SESSION_COOKIE is not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoints: config.endpoints.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PanelResult<T> {
        let url = self.endpoints.resolve(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body = response.text().await?;
        decode_body(&body)
    }
}

/// Pass 2xx responses through; anything else becomes `PanelError::Status`.
async fn ensure_success(response: Response) -> PanelResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), &body))
}

/// Error for a non-2xx response, using the server's `{"error": "..."}`
/// message when the body carries one.
fn status_error(status: u16, body: &str) -> PanelError {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .unwrap_or_default()
        .error;
    PanelError::status(status, message)
}

fn decode_body<T: DeserializeOwned>(body: &str) -> PanelResult<T> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_appointments(&self) -> PanelResult<Vec<Appointment>> {
        let payload: AppointmentsPayload = self.get_json(&self.endpoints.appointments).await?;
        payload.turnos.ok_or(PanelError::MissingField("turnos"))
    }

    async fn fetch_working_days(&self) -> PanelResult<WorkingDays> {
        let payload: WorkingDaysPayload = self.get_json(&self.endpoints.working_days).await?;
        let days = payload
            .dias_trabajados
            .ok_or(PanelError::MissingField("dias_trabajados"))?;
        Ok(WorkingDays::from_server(&days))
    }

    async fn fetch_services(&self) -> PanelResult<Vec<Service>> {
        let payload: ServicesPayload = self.get_json(&self.endpoints.services).await?;
        payload.servicios.ok_or(PanelError::MissingField("servicios"))
    }

    async fn fetch_available_slots(&self, query: &SlotQuery) -> PanelResult<Vec<String>> {
        let payload: SlotsPayload = self.get_json(&query.path(&self.endpoints)).await?;
        payload
            .horarios_disponibles
            .ok_or(PanelError::MissingField("horarios_disponibles"))
    }

    async fn submit_form(&self, form: &FormSubmission) -> PanelResult<()> {
        let url = self.endpoints.resolve(&form.action)?;
        tracing::info!("POST {} ({} campos)", url, form.fields.len());

        let response = self.client.post(url).form(&form.fields).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
