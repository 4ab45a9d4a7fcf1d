//! The appointment modal: create, edit and cancel.
//!
//! `FormController` owns the page context (endpoints, reference data, the
//! appointment collection) and every piece of form state. The modal is
//! either closed, creating a new appointment or editing an existing one.

use chrono::{FixedOffset, NaiveDate};

use crate::availability::{fetch_available_slots, SlotQuery};
use crate::book::AppointmentBook;
use crate::config::{Endpoints, PanelConfig};
use crate::error::{PanelError, PanelResult};
use crate::http::{Backend, FormSubmission};
use crate::models::{Appointment, AppointmentId, ServiceId};
use crate::picker::{DateChange, DatePicker};
use crate::reference::ReferenceData;
use crate::render::escape_html;
use crate::selector::{SlotSelector, SERVICE_FIELD, TIME_FIELD};

pub const DATE_FIELD: &str = "fecha";
pub const CLIENT_NAME_FIELD: &str = "cliente_nombre";
pub const CLIENT_CONTACT_FIELD: &str = "cliente_contacto";
pub const NOTE_FIELD: &str = "nota";
pub const CLIENT_ID_FIELD: &str = "cliente_id";
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Create,
    Edit(AppointmentId),
}

// ── View state ──

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modal {
    pub visible: bool,
    pub title: &'static str,
    pub confirm_label: &'static str,
    pub delete_visible: bool,
    /// Path the form posts to.
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub disabled: bool,
}

impl TextInput {
    /// Typing into a disabled input does nothing.
    pub fn input(&mut self, value: &str) -> bool {
        if self.disabled {
            return false;
        }
        self.value = value.to_string();
        true
    }

    fn reset(&mut self) {
        self.value.clear();
        self.disabled = false;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFields {
    pub nombre: TextInput,
    pub contacto: TextInput,
    pub nota: TextInput,
    /// Hidden input; non-empty for self-booked appointments.
    pub cliente_id: String,
}

impl ClientFields {
    fn clear(&mut self) {
        self.nombre.reset();
        self.contacto.reset();
        self.nota.reset();
        self.cliente_id.clear();
    }

    fn fill_from(&mut self, appointment: &Appointment) {
        let read_only = appointment.is_self_booked();
        self.nombre.value = appointment.client_name().to_string();
        self.contacto.value = appointment.cliente.contacto.clone().unwrap_or_default();
        self.nota.value = appointment.turno.nota.clone().unwrap_or_default();
        self.cliente_id = appointment
            .cliente
            .id
            .map(|id| id.to_string())
            .unwrap_or_default();
        for input in [&mut self.nombre, &mut self.contacto, &mut self.nota] {
            input.disabled = read_only;
        }
    }
}

/// "Cancel appointment?" dialog opened from the edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationDialog {
    pub visible: bool,
    pub appointment_id: Option<AppointmentId>,
    pub action: String,
    pub servicio: String,
    pub cliente: String,
    /// Local date and time, `dd/mm/YYYY HH:MM`.
    pub fecha: String,
}

impl ConfirmationDialog {
    pub fn description_html(&self) -> String {
        let row = |label: &str, class: &str, value: &str| {
            format!(
                "  <div class=\"flex items-center gap-2\">\n    <span class=\"font-semibold text-gray-900\">{}:</span>\n    <span class=\"{}\">{}</span>\n  </div>\n",
                label,
                class,
                escape_html(value)
            )
        };
        let mut html = String::from("<div class=\"space-y-2 text-sm text-gray-700 ml-4\">\n");
        html.push_str(&row("Servicio", "text-sky-700", &self.servicio));
        html.push_str(&row("Cliente", "text-gray-800", &self.cliente));
        html.push_str(&row("Fecha", "text-gray-800", &self.fecha));
        html.push_str("</div>\n");
        html
    }
}

// ── Controller ──

/// Page-lifetime state injected into the controller.
#[derive(Debug, Clone)]
pub struct PanelContext {
    pub endpoints: Endpoints,
    pub reference: ReferenceData,
    pub appointments: AppointmentBook,
    pub offset: FixedOffset,
    pub csrf_token: Option<String>,
}

pub struct FormController<B: Backend> {
    backend: B,
    ctx: PanelContext,
    mode: FormMode,
    modal: Modal,
    fields: ClientFields,
    picker: DatePicker,
    selector: SlotSelector,
    confirmation: ConfirmationDialog,
    scroll_locked: bool,
}

impl<B: Backend> FormController<B> {
    /// Load reference data, then enable the date picker with the working-day predicate.
    pub async fn initialize(backend: B, config: &PanelConfig) -> Self {
        let reference = ReferenceData::load(&backend).await;
        let ctx = PanelContext {
            endpoints: config.endpoints.clone(),
            reference,
            appointments: AppointmentBook::default(),
            offset: config.utc_offset,
            csrf_token: config.csrf_token.clone(),
        };
        Self::new(backend, ctx)
    }

    pub fn new(backend: B, ctx: PanelContext) -> Self {
        let picker = DatePicker::new(ctx.reference.working_days.clone());
        Self {
            backend,
            ctx,
            mode: FormMode::Closed,
            modal: Modal::default(),
            fields: ClientFields::default(),
            picker,
            selector: SlotSelector::new(),
            confirmation: ConfirmationDialog::default(),
            scroll_locked: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn fields(&self) -> &ClientFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ClientFields {
        &mut self.fields
    }

    pub fn picker(&self) -> &DatePicker {
        &self.picker
    }

    pub fn selector(&self) -> &SlotSelector {
        &self.selector
    }

    pub fn confirmation(&self) -> &ConfirmationDialog {
        &self.confirmation
    }

    pub fn context(&self) -> &PanelContext {
        &self.ctx
    }

    /// Whether the page behind the modal is prevented from scrolling.
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Reload the appointment collection the calendar and agenda render from.
    pub async fn load_appointments(&mut self) -> &[Appointment] {
        self.ctx.appointments.refresh(&self.backend).await
    }

    // ── Transitions ──

    pub fn open_create(&mut self) {
        if self.mode != FormMode::Closed {
            self.close();
        }

        self.clear_inputs();
        self.selector.clear();
        self.modal = Modal {
            visible: true,
            title: "Nuevo turno",
            confirm_label: "Crear",
            delete_visible: false,
            action: self.ctx.endpoints.create_action.clone(),
        };
        self.mode = FormMode::Create;
        self.scroll_locked = true;
        tracing::info!("Modal de turnos abierto en modo creación");
    }

    /// Open the modal on an existing appointment. An unknown id is logged
    /// and leaves the modal closed.
    pub async fn open_edit(&mut self, id: AppointmentId) -> PanelResult<()> {
        if self.mode != FormMode::Closed {
            self.close();
        }

        let appointment = match self.ctx.appointments.find(&self.backend, id).await {
            Ok(a) => a,
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "No se encontró el turno con id {}: {}", id, e);
                return Err(e);
            }
        };

        self.mode = FormMode::Edit(id);
        let offset = self.ctx.offset;
        let date = appointment.local_date(&offset);
        let start = appointment.local_hhmm(&offset);
        let service_id = appointment.servicio.id;

        self.selector.render_services(&self.ctx.reference.services);
        if self.ctx.reference.service(service_id).is_some() {
            self.selector.select_service(service_id);
        } else {
            tracing::warn!("Turno {}: servicio {} no está en el listado", id, service_id);
        }

        let ticket = self.selector.begin_times_request();
        let times =
            fetch_available_slots(&self.backend, &SlotQuery::edit(service_id, date, id)).await;
        self.selector.apply_times(ticket, &times);
        if !self.selector.select_time(&start) {
            tracing::info!("Turno {}: el horario {} ya no está disponible", id, start);
        }

        self.fields.fill_from(&appointment);

        if !self.set_date(date, DateChange::Programmatic) {
            tracing::debug!("Turno {}: {} ya no es un día trabajado", id, date);
        }

        self.modal = Modal {
            visible: true,
            title: "Editar turno",
            confirm_label: "Guardar",
            delete_visible: true,
            action: self.ctx.endpoints.edit_action_for(id),
        };
        self.scroll_locked = true;
        tracing::info!("Modal de turnos abierto para editar el turno {}", id);
        Ok(())
    }

    pub fn close(&mut self) {
        self.modal.visible = false;
        self.scroll_locked = false;
        self.clear_inputs();
        self.selector.clear();
        self.confirmation = ConfirmationDialog::default();
        self.mode = FormMode::Closed;
    }

    // ── User input ──

    /// Set the date. A user change invalidates the chosen service and time;
    /// the controller's own changes keep them. Disabled dates are ignored.
    pub fn set_date(&mut self, date: NaiveDate, change: DateChange) -> bool {
        if !self.picker.set_date(date) {
            return false;
        }
        if change == DateChange::User {
            self.selector.reset_for_new_date(&self.ctx.reference.services);
        }
        true
    }

    /// Check a service and load its free times for the chosen date.
    pub async fn select_service(&mut self, service_id: ServiceId) {
        if !self.selector.select_service(service_id) {
            tracing::warn!("Servicio {} no ofrecido, se ignora", service_id);
            return;
        }

        let Some(date) = self.picker.date() else {
            tracing::warn!("Servicio {} elegido sin fecha, no se piden horarios", service_id);
            self.selector.clear_times();
            return;
        };

        let query = match self.mode {
            FormMode::Edit(id) => SlotQuery::edit(service_id, date, id),
            _ => SlotQuery::create(service_id, date),
        };

        let ticket = self.selector.begin_times_request();
        let times = fetch_available_slots(&self.backend, &query).await;
        self.selector.apply_times(ticket, &times);
    }

    pub fn select_time(&mut self, time: &str) -> bool {
        self.selector.select_time(time)
    }

    // ── Submit ──

    /// The post a browser would send, after its required-field check.
    pub fn build_submission(&self) -> PanelResult<FormSubmission> {
        if self.mode == FormMode::Closed {
            return Err(PanelError::Validation("el formulario no está abierto".into()));
        }

        let services = self.selector.service_group();
        let times = self.selector.time_group();
        if services.is_required() && services.checked_value().is_none() {
            return Err(PanelError::Validation(SERVICE_FIELD.into()));
        }
        if times.is_required() && times.checked_value().is_none() {
            return Err(PanelError::Validation(TIME_FIELD.into()));
        }
        let Some(date) = self.picker.value() else {
            return Err(PanelError::Validation(DATE_FIELD.into()));
        };

        let mut fields = Vec::new();
        if let Some(token) = &self.ctx.csrf_token {
            fields.push((CSRF_FIELD.to_string(), token.clone()));
        }
        if let Some(service) = services.checked_value() {
            fields.push((SERVICE_FIELD.to_string(), service.to_string()));
        }
        if let Some(time) = times.checked_value() {
            fields.push((TIME_FIELD.to_string(), time.to_string()));
        }
        fields.push((DATE_FIELD.to_string(), date));

        // Disabled inputs are not part of the post
        for (name, input) in [
            (CLIENT_NAME_FIELD, &self.fields.nombre),
            (CLIENT_CONTACT_FIELD, &self.fields.contacto),
            (NOTE_FIELD, &self.fields.nota),
        ] {
            if !input.disabled {
                fields.push((name.to_string(), input.value.clone()));
            }
        }
        if !self.fields.cliente_id.is_empty() {
            fields.push((CLIENT_ID_FIELD.to_string(), self.fields.cliente_id.clone()));
        }

        Ok(FormSubmission {
            action: self.modal.action.clone(),
            fields,
        })
    }

    /// Post the form. On success the modal closes and the collection reloads.
    pub async fn submit(&mut self) -> PanelResult<()> {
        let form = self.build_submission()?;
        if let Err(e) = self.backend.submit_form(&form).await {
            tracing::error!(kind = ?e.kind(), "Error al guardar el turno: {}", e);
            return Err(e);
        }
        self.close();
        self.load_appointments().await;
        Ok(())
    }

    // ── Delete confirmation ──

    /// Delete action of the edit modal.
    pub async fn request_delete(&mut self) -> PanelResult<()> {
        match self.mode {
            FormMode::Edit(id) => self.open_confirmation(id).await,
            _ => Err(PanelError::Validation("no hay turno en edición".into())),
        }
    }

    pub async fn open_confirmation(&mut self, id: AppointmentId) -> PanelResult<()> {
        let appointment = match self.ctx.appointments.find(&self.backend, id).await {
            Ok(a) => a,
            Err(e) => {
                tracing::error!(kind = ?e.kind(), "No se encontró el turno con id {}: {}", id, e);
                return Err(e);
            }
        };

        let start = appointment.local_start(&self.ctx.offset);
        self.confirmation = ConfirmationDialog {
            visible: true,
            appointment_id: Some(id),
            action: self.ctx.endpoints.delete_action_for(id),
            servicio: appointment.servicio.nombre.clone(),
            cliente: appointment.client_name().to_string(),
            fecha: start.format("%d/%m/%Y %H:%M").to_string(),
        };
        Ok(())
    }

    pub fn close_confirmation(&mut self) {
        self.confirmation.visible = false;
    }

    /// Post the delete form. On success everything closes and the collection reloads.
    pub async fn confirm_delete(&mut self) -> PanelResult<()> {
        if !self.confirmation.visible {
            return Err(PanelError::Validation("no hay confirmación abierta".into()));
        }

        let mut fields = Vec::new();
        if let Some(token) = &self.ctx.csrf_token {
            fields.push((CSRF_FIELD.to_string(), token.clone()));
        }
        let form = FormSubmission {
            action: self.confirmation.action.clone(),
            fields,
        };

        if let Err(e) = self.backend.submit_form(&form).await {
            tracing::error!(kind = ?e.kind(), "Error al cancelar el turno: {}", e);
            return Err(e);
        }
        tracing::info!("Turno {:?} cancelado", self.confirmation.appointment_id);
        self.close();
        self.load_appointments().await;
        Ok(())
    }

    fn clear_inputs(&mut self) {
        self.fields.clear();
        self.picker.clear();
    }
}
