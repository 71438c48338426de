use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use dialoguer::console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use raybot_cli::app::{
    register_plugins, App, Notification, NotificationLevel, Notifications, QueryClient, Router,
};
use raybot_cli::edit::{self, Assignment};
use raybot_cli::types::{
    CloudConfig, CommandConfig, ConfigDomain, ConfigResource, HardwareConfig, HttpConfig,
    LogConfig, WifiConfig,
};
use raybot_cli::{ConfigApi, ReqwestHttpClient, Settings};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::broadcast::Receiver;

use crate::args::{ConfigCommands, OutputFormat};

/// Run `$body` with `$record` bound to the record type of `$domain`.
macro_rules! with_record {
    ($domain:expr, $record:ident => $body:expr) => {
        match $domain {
            ConfigDomain::Log => {
                type $record = LogConfig;
                $body
            }
            ConfigDomain::Hardware => {
                type $record = HardwareConfig;
                $body
            }
            ConfigDomain::Cloud => {
                type $record = CloudConfig;
                $body
            }
            ConfigDomain::Http => {
                type $record = HttpConfig;
                $body
            }
            ConfigDomain::Wifi => {
                type $record = WifiConfig;
                $body
            }
            ConfigDomain::Command => {
                type $record = CommandConfig;
                $body
            }
        }
    };
}

pub(crate) async fn cmd_config(api_url: Option<&str>, command: ConfigCommands) -> anyhow::Result<()> {
    let settings = Settings::load(api_url)?;
    let session = Session::start(&settings)?;

    let result = match command {
        ConfigCommands::Domains => {
            session.print_domains();
            Ok(())
        }
        ConfigCommands::Get {
            domain: Some(domain),
            format,
        } => with_record!(domain, R => session.print_one::<R>(format).await),
        ConfigCommands::Get {
            domain: None,
            format,
        } => session.print_all(format).await,
        ConfigCommands::Set { domain, file, yes } => {
            with_record!(domain, R => session.set_from_file::<R>(&file, yes).await)
        }
        ConfigCommands::Edit {
            domain,
            assignments,
            yes,
        } => with_record!(domain, R => session.edit::<R>(&assignments, yes).await),
    };

    if let Err(err) = &result {
        session.notifications.error(format!("{err:#}"));
    }
    session.flush_notifications();
    result
}

/// Everything one invocation needs: the app with its plugins, the API
/// client, and a subscription to user-facing notifications.
struct Session {
    app: App,
    api: ConfigApi<ReqwestHttpClient>,
    query: QueryClient,
    notifications: Notifications,
    inbox: Receiver<Notification>,
}

impl Session {
    fn start(settings: &Settings) -> anyhow::Result<Self> {
        let mut app = App::new("raybot");
        register_plugins(&mut app, settings.query.clone()).context("failed to start the app")?;

        let http = ReqwestHttpClient::builder(settings.api_url.as_str())
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;
        tracing::debug!(base_url = http.base_url(), "Using raybot API");

        let query = app
            .extension::<QueryClient>()
            .cloned()
            .context("query client is not installed")?;
        let notifications = app
            .extension::<Notifications>()
            .cloned()
            .context("notifications are not installed")?;
        let inbox = notifications.subscribe();

        Ok(Self {
            app,
            api: ConfigApi::new(http),
            query,
            notifications,
            inbox,
        })
    }

    fn print_domains(&self) {
        let router = self.app.extension::<Router>();
        for domain in ConfigDomain::ALL {
            let page = router
                .and_then(|r| r.by_name(&format!("settings/{}", domain.name())))
                .map(|route| route.path.as_str())
                .unwrap_or("-");
            println!(
                "{:<10} {:<20} {}",
                style(domain.name()).bold(),
                domain.path(),
                style(page).dim()
            );
        }
    }

    async fn fetch<R: ConfigResource>(&self) -> anyhow::Result<R> {
        let api = self.api.clone();
        self.query
            .fetch(R::DOMAIN.name(), move || {
                let api = api.clone();
                async move { api.get::<R>().await }
            })
            .await
            .with_context(|| format!("failed to read {} configuration", R::DOMAIN))
    }

    async fn print_one<R: ConfigResource>(&self, format: OutputFormat) -> anyhow::Result<()> {
        let record = self.fetch::<R>().await?;
        println!("{}", render(&record, format)?);
        Ok(())
    }

    async fn print_all(&self, format: OutputFormat) -> anyhow::Result<()> {
        let pb = create_spinner("Reading configuration");
        let all = spinning(&pb, async {
            let mut all = Map::new();
            for domain in ConfigDomain::ALL {
                pb.set_message(format!("Reading {domain} configuration"));
                let value =
                    with_record!(domain, R => serde_json::to_value(self.fetch::<R>().await?)?);
                all.insert(domain.name().to_string(), value);
            }
            Ok::<_, anyhow::Error>(all)
        })
        .await?;

        println!("{}", render(&Value::Object(all), format)?);
        Ok(())
    }

    async fn set_from_file<R: ConfigResource>(&self, file: &Path, yes: bool) -> anyhow::Result<()> {
        let value = edit::read_record_file(file)?;
        let record: R = edit::decode_record(value)?;
        tracing::debug!(domain = %R::DOMAIN, file = %file.display(), "Record read from file");

        self.replace(record, yes).await
    }

    async fn edit<R: ConfigResource>(&self, assignments: &[Assignment], yes: bool) -> anyhow::Result<()> {
        // Edits must start from what the robot holds right now.
        self.query.invalidate(R::DOMAIN.name());
        let current = self.fetch::<R>().await?;

        let before = serde_json::to_value(&current)?;
        let mut after = before.clone();
        for assignment in assignments {
            edit::apply(&mut after, assignment)?;
            tracing::debug!(domain = %R::DOMAIN, %assignment, "Assignment applied");
        }

        if after == before {
            self.notifications
                .info(format!("{} configuration is already up to date", R::DOMAIN));
            return Ok(());
        }

        let record: R = edit::decode_record(after)?;
        self.replace(record, yes).await
    }

    async fn replace<R: ConfigResource>(&self, record: R, yes: bool) -> anyhow::Result<()> {
        let preview = masked(serde_json::to_value(&record)?);
        eprintln!("{}", render(&preview, OutputFormat::Json)?);
        if !confirm(&format!("Replace the {} configuration?", R::DOMAIN), yes)? {
            self.notifications.warn("Cancelled, nothing was changed");
            return Ok(());
        }

        self.api
            .update(&record)
            .await
            .with_context(|| format!("failed to update {} configuration", R::DOMAIN))?;

        self.query.set_query_data(R::DOMAIN.name(), record);
        self.notifications
            .success(format!("{} configuration updated", R::DOMAIN));
        Ok(())
    }

    fn flush_notifications(mut self) {
        while let Ok(notification) = self.inbox.try_recv() {
            let prefix = match notification.level {
                NotificationLevel::Success => style("✓").green(),
                NotificationLevel::Info => style("→").cyan(),
                NotificationLevel::Warning => style("!").yellow(),
                NotificationLevel::Error => style("✗").red(),
            };
            eprintln!("{} {}", prefix, notification.message);
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Toml => toml::to_string_pretty(value)?,
    };
    Ok(rendered)
}

const SECRET_FIELDS: &[&str] = &["password", "token"];
const MASK: &str = "********";

/// Hide non-empty secrets anywhere in `value`.
fn masked(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) if !s.is_empty() && is_secret(&key) => {
                            Value::String(MASK.to_string())
                        }
                        other => masked(other),
                    };
                    (key, value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(masked).collect()),
        other => other,
    }
}

fn is_secret(key: &str) -> bool {
    SECRET_FIELDS.contains(&key)
}

/// Await `work`, then clear the spinner whether it succeeded or not.
async fn spinning<T>(
    pb: &ProgressBar,
    work: impl std::future::Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    let result = work.await;
    pb.finish_and_clear();
    result
}

fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }

    let is_interactive = std::io::IsTerminal::is_terminal(&std::io::stdin())
        && std::io::IsTerminal::is_terminal(&std::io::stderr());
    if !is_interactive {
        anyhow::bail!("Refusing to change configuration without a terminal. Pass --yes to confirm.");
    }

    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
