use dialoguer::console::style;
use raybot_cli::settings::{config_path, Settings};

pub(crate) fn cmd_settings(api_url: Option<&str>) -> anyhow::Result<()> {
    let settings = Settings::load(api_url)?;
    let path = config_path();

    let rows = [
        ("API URL", settings.api_url.clone()),
        ("Timeout", format!("{}s", settings.timeout.as_secs())),
        ("User agent", settings.user_agent.clone()),
        ("Stale time", format!("{}s", settings.query.stale_time_secs)),
        ("Retries", settings.query.retry.to_string()),
        ("Settings file", path.display().to_string()),
    ];

    for (label, value) in rows {
        println!("{:<14} {}", style(label).bold(), value);
    }
    if !path.exists() {
        println!("{:<14} {}", "", style("(not created, using defaults)").dim());
    }
    Ok(())
}
