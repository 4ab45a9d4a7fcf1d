use chrono::Utc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use turnos_panel::agenda::{calendar_events, render_agenda_text};
use turnos_panel::book::AppointmentBook;
use turnos_panel::config::PanelConfig;
use turnos_panel::http::HttpBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // ── Tracing: logs go to stderr, stdout carries the output ──
    let env_filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let view = std::env::args().nth(1).unwrap_or_else(|| "agenda".into());

    let config = PanelConfig::from_env()?;
    let backend = HttpBackend::new(&config)?;
    tracing::info!("Panel de turnos contra {}", config.endpoints.base);

    // Readers only need the appointment collection
    let mut book = AppointmentBook::default();
    let appointments = book.refresh(&backend).await;

    match view.as_str() {
        "agenda" => {
            let today = Utc::now().with_timezone(&config.utc_offset).date_naive();
            print!("{}", render_agenda_text(appointments, today, &config.utc_offset));
        }
        "calendario" => {
            let events = calendar_events(appointments);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        other => anyhow::bail!("vista desconocida: {} (usar agenda o calendario)", other),
    }

    Ok(())
}
