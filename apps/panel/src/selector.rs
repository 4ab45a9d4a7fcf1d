//! Service and time-slot radio lists of the appointment form.
//!
//! Times only exist for a chosen service and date. Each list marks its first
//! row as required, so an empty list silently carries no required field.

use crate::models::{Service, ServiceId};
use crate::render::{escape_html, price_label};

pub const SERVICE_FIELD: &str = "servicio";
pub const TIME_FIELD: &str = "hora";

#[derive(Debug, Clone, PartialEq)]
pub struct RadioRow {
    pub value: String,
    pub label: String,
    /// Secondary line (duration and price for services).
    pub detail: Option<String>,
    /// Color dot shown before the label.
    pub swatch: Option<String>,
    pub checked: bool,
    pub required: bool,
}

impl RadioRow {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
            detail: None,
            swatch: None,
            checked: false,
            required: false,
        }
    }
}

/// A group of radio inputs sharing one `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioGroup {
    name: &'static str,
    rows: Vec<RadioRow>,
}

impl RadioGroup {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> &[RadioRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Replace every row, marking the first one required when there is one.
    fn redraw(&mut self, rows: Vec<RadioRow>) {
        self.rows = rows;
        if let Some(first) = self.rows.first_mut() {
            first.required = true;
        }
    }

    /// A group counts as required when its first row carries the marker.
    pub fn is_required(&self) -> bool {
        self.rows.first().is_some_and(|r| r.required)
    }

    /// Check the row with `value`, unchecking the rest. Returns false and
    /// leaves the group untouched when no row has that value.
    pub fn check(&mut self, value: &str) -> bool {
        if !self.rows.iter().any(|r| r.value == value) {
            return false;
        }
        for row in &mut self.rows {
            row.checked = row.value == value;
        }
        true
    }

    pub fn checked_value(&self) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.checked)
            .map(|r| r.value.as_str())
    }

    pub fn render_html(&self) -> String {
        let mut html = String::new();
        for row in &self.rows {
            html.push_str(
                "<label class=\"flex items-center gap-4 p-2 rounded cursor-pointer hover:bg-slate-50\">\n",
            );
            html.push_str(&format!(
                "  <input type=\"radio\" name=\"{}\" value=\"{}\" class=\"hidden peer\"{}{}>\n",
                self.name,
                escape_html(&row.value),
                if row.checked { " checked" } else { "" },
                if row.required { " required" } else { "" },
            ));
            match (&row.swatch, &row.detail) {
                (None, None) => html.push_str(&format!(
                    "  <p class=\"w-full h-full flex items-center gap-2 px-2 py-1 -m-2 rounded peer-checked:border peer-checked:border-sky-700 peer-checked:bg-gray-50\">{}</p>\n",
                    escape_html(&row.label)
                )),
                _ => {
                    html.push_str("  <div class=\"w-full h-full flex items-center gap-2 px-2 py-1 -m-2 rounded peer-checked:border peer-checked:border-sky-700 peer-checked:bg-gray-50\">\n");
                    if let Some(color) = &row.swatch {
                        let color = escape_html(color);
                        html.push_str(&format!(
                            "    <div class=\"relative w-3 h-3 rounded-full shadow\" style=\"background:{color}\">\n      <div class=\"absolute inset-0 rounded-full border\" style=\"border-color:{color}; filter:brightness(0.8);\"></div>\n    </div>\n"
                        ));
                    }
                    html.push_str(&format!(
                        "    <div>\n      <p class=\"font-medium text-slate-900\">{}</p>\n",
                        escape_html(&row.label)
                    ));
                    if let Some(detail) = &row.detail {
                        html.push_str(&format!(
                            "      <p class=\"text-xs text-slate-500\">{}</p>\n",
                            escape_html(detail)
                        ));
                    }
                    html.push_str("    </div>\n  </div>\n");
                }
            }
            html.push_str("</label>\n");
        }
        html
    }
}

/// Identifies one availability request. Only the newest ticket may fill the
/// time list; older responses are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimesTicket(u64);

#[derive(Debug, Clone)]
pub struct SlotSelector {
    services: Vec<Service>,
    service_group: RadioGroup,
    time_group: RadioGroup,
    selected_service: Option<Service>,
    generation: u64,
}

impl Default for SlotSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotSelector {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            service_group: RadioGroup::new(SERVICE_FIELD),
            time_group: RadioGroup::new(TIME_FIELD),
            selected_service: None,
            generation: 0,
        }
    }

    pub fn service_group(&self) -> &RadioGroup {
        &self.service_group
    }

    pub fn time_group(&self) -> &RadioGroup {
        &self.time_group
    }

    pub fn selected_service(&self) -> Option<&Service> {
        self.selected_service.as_ref()
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.time_group.checked_value()
    }

    pub fn available_times(&self) -> Vec<&str> {
        self.time_group.rows().iter().map(|r| r.value.as_str()).collect()
    }

    /// Draw one row per service, nothing checked.
    pub fn render_services(&mut self, services: &[Service]) {
        self.services = services.to_vec();
        self.selected_service = None;
        let rows = services
            .iter()
            .map(|s| RadioRow {
                value: s.id.to_string(),
                label: s.nombre.clone(),
                detail: Some(format!("{} minutos {}", s.duracion, price_label(s.precio))),
                swatch: Some(s.color_or_default().to_string()),
                checked: false,
                required: false,
            })
            .collect();
        self.service_group.redraw(rows);
    }

    pub fn clear_services(&mut self) {
        self.service_group.clear();
        self.selected_service = None;
    }

    /// Check a service row. Unknown ids leave the selection as it was and
    /// return false; the caller decides whether that is worth logging.
    pub fn select_service(&mut self, id: ServiceId) -> bool {
        let Some(service) = self.services.iter().find(|s| s.id == id).cloned() else {
            return false;
        };
        if !self.service_group.check(&id.to_string()) {
            return false;
        }
        self.selected_service = Some(service);
        true
    }

    /// Start an availability request; any earlier pending one becomes stale.
    pub fn begin_times_request(&mut self) -> TimesTicket {
        self.generation += 1;
        TimesTicket(self.generation)
    }

    /// Render the times answered for `ticket`, unless a newer request or a
    /// clear happened in between.
    pub fn apply_times(&mut self, ticket: TimesTicket, times: &[String]) -> bool {
        if ticket.0 != self.generation {
            tracing::warn!(
                "Respuesta de horarios vieja descartada ({} de {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.render_times(times);
        true
    }

    pub fn render_times(&mut self, times: &[String]) {
        let rows = times.iter().map(|t| RadioRow::plain(t)).collect();
        self.time_group.redraw(rows);
    }

    /// Check the time row matching `time`. A time no longer offered leaves
    /// the group unchecked.
    pub fn select_time(&mut self, time: &str) -> bool {
        self.time_group.check(time)
    }

    /// Clear the time rows and invalidate pending requests.
    pub fn clear_times(&mut self) {
        self.time_group.clear();
        self.generation += 1;
    }

    /// Everything downstream of the date: times cleared, services redrawn unchecked.
    pub fn reset_for_new_date(&mut self, services: &[Service]) {
        self.clear_times();
        self.render_services(services);
    }

    pub fn clear(&mut self) {
        self.clear_times();
        self.clear_services();
    }
}
