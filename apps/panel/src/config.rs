use std::env;
use std::time::Duration;

use chrono::{FixedOffset, Local};
use url::Url;

use crate::error::PanelResult;

/// Path token the server puts where a service or appointment id goes.
pub const ID_PLACEHOLDER: &str = "0/";
/// Path token for the requested date.
pub const DATE_PLACEHOLDER: &str = "placeholder";
/// Path token for the appointment excluded from availability.
pub const EXCLUDED_PLACEHOLDER: &str = "9999/";

/// Endpoint path templates, as rendered by the server into the page.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub base: Url,
    pub appointments: String,
    pub working_days: String,
    pub services: String,
    pub slots: String,
    pub slots_excluding: String,
    pub create_action: String,
    pub edit_action: String,
    pub delete_action: String,
}

impl Endpoints {
    /// Default paths mounted under `base`.
    pub fn with_base(base: Url) -> Self {
        Self {
            base,
            appointments: "/turnos/api/turnos/".into(),
            working_days: "/turnos/api/dias-trabajados/".into(),
            services: "/turnos/api/servicios/".into(),
            slots: "/turnos/api/horarios-disponibles/0/placeholder/".into(),
            slots_excluding: "/turnos/api/horarios-disponibles/0/placeholder/9999/".into(),
            create_action: "/turnos/crear/".into(),
            edit_action: "/turnos/0/editar/".into(),
            delete_action: "/turnos/0/eliminar/".into(),
        }
    }

    /// Resolve a filled path template against the base URL.
    pub fn resolve(&self, path: &str) -> PanelResult<Url> {
        Ok(self.base.join(path)?)
    }

    pub fn edit_action_for(&self, id: i64) -> String {
        fill_first(&self.edit_action, ID_PLACEHOLDER, &format!("{}/", id))
    }

    pub fn delete_action_for(&self, id: i64) -> String {
        fill_first(&self.delete_action, ID_PLACEHOLDER, &format!("{}/", id))
    }
}

/// Replace the first occurrence of `token`. Templates without it come back unchanged.
pub fn fill_first(template: &str, token: &str, value: &str) -> String {
    template.replacen(token, value, 1)
}

/// Replace the last occurrence of `token`.
pub fn fill_last(template: &str, token: &str, value: &str) -> String {
    match template.rfind(token) {
        Some(pos) => {
            let mut out = String::with_capacity(template.len() + value.len());
            out.push_str(&template[..pos]);
            out.push_str(value);
            out.push_str(&template[pos + token.len()..]);
            out
        }
        None => template.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub endpoints: Endpoints,
    /// Raw `Cookie` header carrying the session.
    pub session_cookie: Option<String>,
    pub csrf_token: Option<String>,
    pub timeout: Option<Duration>,
    /// Offset used as "local time" for day equality and hour display.
    pub utc_offset: FixedOffset,
}

impl PanelConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base = env::var("TURNOS_BASE_URL")
            .map_err(|_| anyhow::anyhow!("TURNOS_BASE_URL must be set"))?;
        let base = Url::parse(&base)
            .map_err(|e| anyhow::anyhow!("TURNOS_BASE_URL is not a valid URL: {}", e))?;

        let mut endpoints = Endpoints::with_base(base);
        override_path(&mut endpoints.appointments, "TURNOS_URL_TURNOS");
        override_path(&mut endpoints.working_days, "TURNOS_URL_DIAS");
        override_path(&mut endpoints.services, "TURNOS_URL_SERVICIOS");
        override_path(&mut endpoints.slots, "TURNOS_URL_HORARIOS");
        override_path(&mut endpoints.slots_excluding, "TURNOS_URL_HORARIOS_TURNO");
        override_path(&mut endpoints.create_action, "TURNOS_URL_CREAR");
        override_path(&mut endpoints.edit_action, "TURNOS_URL_EDITAR");
        override_path(&mut endpoints.delete_action, "TURNOS_URL_ELIMINAR");

        let session_cookie = non_empty_var("TURNOS_SESSION_COOKIE");
        let csrf_token = non_empty_var("TURNOS_CSRF_TOKEN");

        let timeout = match non_empty_var("TURNOS_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                anyhow::anyhow!("TURNOS_HTTP_TIMEOUT_SECS must be a number of seconds")
            })?)),
            None => None,
        };

        let utc_offset = match non_empty_var("TURNOS_UTC_OFFSET") {
            Some(raw) => parse_offset(&raw)
                .ok_or_else(|| anyhow::anyhow!("TURNOS_UTC_OFFSET must look like -03:00"))?,
            None => *Local::now().offset(),
        };

        if session_cookie.is_none() {
            tracing::warn!("TURNOS_SESSION_COOKIE sin definir, los endpoints autenticados van a fallar");
        }

        Ok(Self {
            endpoints,
            session_cookie,
            csrf_token,
            timeout,
            utc_offset,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn override_path(slot: &mut String, key: &str) {
    if let Some(path) = non_empty_var(key) {
        *slot = path;
    }
}

/// Parse `±HH:MM` into an offset.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => (1, raw),
    };
    let (h, m) = rest.split_once(':')?;
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::with_base(Url::parse("http://10.0.0.1:8000").unwrap())
    }

    // ── fill_first / fill_last ──

    #[test]
    fn test_fill_first_only_first() {
        assert_eq!(fill_first("/a/0/b/0/", "0/", "5/"), "/a/5/b/0/");
    }

    #[test]
    fn test_fill_missing_token_unchanged() {
        assert_eq!(fill_first("/a/b/", "0/", "5/"), "/a/b/");
        assert_eq!(fill_last("/a/b/", "9999/", "5/"), "/a/b/");
    }

    #[test]
    fn test_fill_last_picks_last() {
        assert_eq!(fill_last("/9999/x/9999/", "9999/", "1/"), "/9999/x/1/");
    }

    // ── actions ──

    #[test]
    fn test_edit_and_delete_actions() {
        let e = endpoints();
        assert_eq!(e.edit_action_for(42), "/turnos/42/editar/");
        assert_eq!(e.delete_action_for(42), "/turnos/42/eliminar/");
    }

    #[test]
    fn test_resolve_keeps_origin_digits() {
        let e = endpoints();
        let url = e.resolve(&e.edit_action_for(3)).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.1:8000/turnos/3/editar/");
    }

    // ── parse_offset ──

    #[test]
    fn test_parse_offset_negative() {
        assert_eq!(parse_offset("-03:00"), FixedOffset::west_opt(3 * 3600));
    }

    #[test]
    fn test_parse_offset_positive_and_bare() {
        assert_eq!(parse_offset("+05:30"), FixedOffset::east_opt(5 * 3600 + 1800));
        assert_eq!(parse_offset("02:00"), FixedOffset::east_opt(2 * 3600));
    }

    #[test]
    fn test_parse_offset_invalid() {
        assert_eq!(parse_offset(""), None);
        assert_eq!(parse_offset("-3"), None);
        assert_eq!(parse_offset("+25:00"), None);
    }
}
