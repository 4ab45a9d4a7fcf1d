//! Read-only views over the appointment collection: month calendar events
//! and today's agenda.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::models::{Appointment, AppointmentId};
use crate::render::{escape_html, format_long_date_es};

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#FFFFFF";

/// YIQ brightness threshold (scaled by 1000): at or above reads better with black text.
const YIQ_THRESHOLD_MILLI: u32 = 128_000;

/// Parse `#RRGGBB` or `#RGB` into its components.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Foreground color for text drawn on `background`. Unreadable colors get white.
pub fn text_color_for(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex_color(background) else {
        return WHITE;
    };
    // Y = 0.299R + 0.587G + 0.114B, kept in integers so the boundary is exact
    let yiq = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    if yiq >= YIQ_THRESHOLD_MILLI {
        BLACK
    } else {
        WHITE
    }
}

// ── Month calendar ──

/// One event handed to the calendar widget. Clicking it opens the form in
/// edit mode for `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: AppointmentId,
    pub all_day: bool,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub color: String,
    pub text_color: &'static str,
    pub display: &'static str,
    pub class_names: &'static str,
}

impl From<&Appointment> for CalendarEvent {
    fn from(a: &Appointment) -> Self {
        let color = a.servicio.color_or_default().to_string();
        Self {
            id: a.id,
            all_day: false,
            title: a.servicio.nombre.clone(),
            start: a.turno.inicio,
            end: a.turno.fin,
            text_color: text_color_for(&color),
            color,
            display: "block",
            class_names: "cursor-pointer",
        }
    }
}

pub fn calendar_events(appointments: &[Appointment]) -> Vec<CalendarEvent> {
    appointments.iter().map(CalendarEvent::from).collect()
}

// ── Today's agenda ──

/// Appointments starting on `today` (in `offset` local time), earliest first.
pub fn todays_agenda<'a>(
    appointments: &'a [Appointment],
    today: NaiveDate,
    offset: &FixedOffset,
) -> Vec<&'a Appointment> {
    let mut list: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.local_date(offset) == today)
        .collect();
    list.sort_by_key(|a| a.turno.inicio);
    list
}

/// 24-hour `HH:MM` in local time.
pub fn format_hour(at: &DateTime<FixedOffset>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%H:%M").to_string()
}

pub fn render_agenda_html(
    appointments: &[Appointment],
    today: NaiveDate,
    offset: &FixedOffset,
) -> String {
    let mut html = format!(
        "<div class=\"flex flex-col h-full\">\n  <div class=\"mb-2 font-semibold text-slate-700 shrink-0\">\n    Agenda de hoy · {}\n  </div>\n  <div id=\"lista-hoy\" class=\"overflow-auto p-1 grow\">\n",
        format_long_date_es(today)
    );

    let list = todays_agenda(appointments, today, offset);
    if list.is_empty() {
        html.push_str("    <div class=\"text-sm text-slate-500\">No hay turnos para hoy.</div>\n");
    } else {
        html.push_str("    <ul class=\"divide-y divide-slate-100 overflow-y-auto\">\n");
        for a in list {
            html.push_str(&render_agenda_row(a, offset));
        }
        html.push_str("    </ul>\n");
    }

    html.push_str("  </div>\n</div>\n");
    html
}

fn render_agenda_row(a: &Appointment, offset: &FixedOffset) -> String {
    let color = escape_html(a.servicio.color_or_default());
    let text = text_color_for(a.servicio.color_or_default());
    let notes = match a.turno.nota.as_deref().filter(|n| !n.is_empty()) {
        Some(n) => format!("Notas: {}", escape_html(n)),
        None => String::new(),
    };

    format!(
        concat!(
            "      <li class=\"py-2 flex items-start gap-3\">\n",
            "        <div class=\"h-8 w-12 rounded-md ring-1 ring-slate-200 grid place-items-center text-xs\" style=\"background:{color}\">\n",
            "          <p class=\"font-bold\" style=\"color:{text}\">{hour}</p>\n",
            "        </div>\n",
            "        <div class=\"min-w-0 flex-1\">\n",
            "          <div class=\"text-sm font-medium text-slate-900 truncate\">{client} · {service}</div>\n",
            "          <div class=\"text-[11px] text-slate-500\">{notes}</div>\n",
            "        </div>\n",
            "        <button title=\"Seleccionar para editar/cancelar\" data-id=\"{id}\" class=\"shrink-0 rounded-md border border-slate-200 bg-white px-2 py-1 text-xs font-medium hover:bg-slate-50 cursor-pointer\">Seleccionar</button>\n",
            "      </li>\n",
        ),
        color = color,
        text = text,
        hour = format_hour(&a.turno.inicio, offset),
        client = escape_html(a.client_name()),
        service = escape_html(&a.servicio.nombre),
        notes = notes,
        id = a.id,
    )
}

/// Plain-text agenda for terminals.
pub fn render_agenda_text(
    appointments: &[Appointment],
    today: NaiveDate,
    offset: &FixedOffset,
) -> String {
    let mut text = format!("Agenda de hoy · {}\n\n", format_long_date_es(today));
    let list = todays_agenda(appointments, today, offset);
    if list.is_empty() {
        text.push_str("No hay turnos para hoy.\n");
        return text;
    }
    for a in list {
        text.push_str(&format!(
            "{}  {} · {}  [#{}]\n",
            format_hour(&a.turno.inicio, offset),
            a.client_name(),
            a.servicio.nombre,
            a.id,
        ));
        if let Some(nota) = a.turno.nota.as_deref().filter(|n| !n.is_empty()) {
            text.push_str(&format!("       Notas: {}\n", nota));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{appointment, art, service};

    // ── text_color_for ──

    #[test]
    fn test_white_background_black_text() {
        assert_eq!(text_color_for("#FFFFFF"), BLACK);
    }

    #[test]
    fn test_black_background_white_text() {
        assert_eq!(text_color_for("#000000"), WHITE);
    }

    #[test]
    fn test_threshold_boundary() {
        // 0.299*128 + 0.587*128 + 0.114*128 = 128
        assert_eq!(text_color_for("#808080"), BLACK);
        // 127 on every channel is just below
        assert_eq!(text_color_for("#7F7F7F"), WHITE);
    }

    #[test]
    fn test_short_hex_and_no_hash() {
        assert_eq!(text_color_for("#fff"), BLACK);
        assert_eq!(text_color_for("000"), WHITE);
    }

    #[test]
    fn test_invalid_color_white() {
        assert_eq!(text_color_for("rojo"), WHITE);
        assert_eq!(text_color_for("#12345"), WHITE);
        assert_eq!(text_color_for("#GGGGGG"), WHITE);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF5733"), Some((0xFF, 0x57, 0x33)));
        assert_eq!(parse_hex_color("#abc"), Some((0xAA, 0xBB, 0xCC)));
    }

    // ── calendar_events ──

    #[test]
    fn test_calendar_event_fields() {
        let a = appointment(5, "2024-01-01T09:00:00-03:00", service(1, "Corte", "#FFFF00"));
        let events = calendar_events(&[a]);
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.id, 5);
        assert_eq!(e.title, "Corte");
        assert_eq!(e.text_color, BLACK);
        assert!(!e.all_day);

        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["textColor"], "#000000");
        assert_eq!(json["classNames"], "cursor-pointer");
        assert_eq!(json["allDay"], false);
    }

    // ── todays_agenda ──

    #[test]
    fn test_today_filter_keeps_only_today() {
        let s = service(1, "Corte", "#000000");
        let list = vec![
            appointment(1, "2024-01-01T09:00:00-03:00", s.clone()),
            appointment(2, "2024-01-02T09:00:00-03:00", s),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let agenda = todays_agenda(&list, today, &art());
        assert_eq!(agenda.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_today_sorted_by_start() {
        let s = service(1, "Corte", "#000000");
        let list = vec![
            appointment(1, "2024-01-01T15:00:00-03:00", s.clone()),
            appointment(2, "2024-01-01T08:30:00-03:00", s.clone()),
            appointment(3, "2024-01-01T11:00:00-03:00", s),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let agenda = todays_agenda(&list, today, &art());
        assert_eq!(agenda.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn test_today_uses_local_day() {
        // 01:00 UTC on the 2nd is still the 1st at UTC-3
        let s = service(1, "Corte", "#000000");
        let list = vec![appointment(1, "2024-01-02T01:00:00Z", s)];
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(todays_agenda(&list, today, &art()).len(), 1);
    }

    // ── render ──

    #[test]
    fn test_render_empty_agenda() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let html = render_agenda_html(&[], today, &art());
        assert!(html.contains("Agenda de hoy · lunes, 1 de enero"));
        assert!(html.contains("No hay turnos para hoy."));
    }

    #[test]
    fn test_render_agenda_row() {
        let mut a = appointment(7, "2024-01-01T09:05:00-03:00", service(1, "Corte", "#000000"));
        a.turno.nota = Some("Traer <foto>".into());
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let html = render_agenda_html(&[a], today, &art());
        assert!(html.contains(">09:05</p>"));
        assert!(html.contains("Cliente 7 · Corte"));
        assert!(html.contains("Notas: Traer &lt;foto&gt;"));
        assert!(html.contains("data-id=\"7\""));
        assert!(html.contains("color:#FFFFFF"));
    }

    #[test]
    fn test_render_agenda_text() {
        let a = appointment(3, "2024-01-01T10:00:00-03:00", service(1, "Corte", "#000000"));
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let text = render_agenda_text(&[a], today, &art());
        assert!(text.contains("10:00  Cliente 3 · Corte  [#3]"));
    }
}
