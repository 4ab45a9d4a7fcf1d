//! Small formatting helpers shared by the HTML fragments.

/// Escape text for interpolation into HTML content or a quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// es-AR number formatting: `.` groups thousands, `,` separates up to three
/// decimals, trailing zeros dropped.
pub fn format_amount_ar(value: f64) -> String {
    let millis = (value.abs() * 1000.0).round() as u64;
    let whole = millis / 1000;
    let fraction = millis % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && millis > 0 { "-" } else { "" };
    if fraction == 0 {
        return format!("{sign}{grouped}");
    }
    let decimals = format!("{:03}", fraction);
    format!("{sign}{grouped},{}", decimals.trim_end_matches('0'))
}

/// Price suffix of a service row; null and zero both read as free.
pub fn price_label(precio: Option<f64>) -> String {
    match precio {
        Some(p) if p != 0.0 => format!("· ${}", format_amount_ar(p)),
        _ => "· Gratuito".to_string(),
    }
}

const WEEKDAYS_ES: [&str; 7] = [
    "lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo",
];

const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// "lunes, 1 de enero"
pub fn format_long_date_es(date: chrono::NaiveDate) -> String {
    use chrono::Datelike;
    format!(
        "{}, {} de {}",
        WEEKDAYS_ES[date.weekday().num_days_from_monday() as usize],
        date.day(),
        MONTHS_ES[date.month0() as usize],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Ana" & 'Luis'</b>"#),
            "&lt;b&gt;&quot;Ana&quot; &amp; &#39;Luis&#39;&lt;/b&gt;"
        );
    }

    // ── format_amount_ar ──

    #[test]
    fn test_amount_grouping() {
        assert_eq!(format_amount_ar(0.0), "0");
        assert_eq!(format_amount_ar(999.0), "999");
        assert_eq!(format_amount_ar(1500.0), "1.500");
        assert_eq!(format_amount_ar(1234567.0), "1.234.567");
    }

    #[test]
    fn test_amount_decimals() {
        assert_eq!(format_amount_ar(1500.5), "1.500,5");
        assert_eq!(format_amount_ar(12.25), "12,25");
        assert_eq!(format_amount_ar(12.345), "12,345");
        assert_eq!(format_amount_ar(0.05), "0,05");
    }

    #[test]
    fn test_amount_rounds_past_three_decimals() {
        assert_eq!(format_amount_ar(1.0004), "1");
        assert_eq!(format_amount_ar(2.0006), "2,001");
        assert_eq!(format_amount_ar(-1500.5), "-1.500,5");
    }

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(Some(2500.0)), "· $2.500");
        assert_eq!(price_label(Some(0.0)), "· Gratuito");
        assert_eq!(price_label(None), "· Gratuito");
    }

    #[test]
    fn test_long_date() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_long_date_es(d), "lunes, 1 de enero");
        let d = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(format_long_date_es(d), "domingo, 18 de octubre");
    }
}
