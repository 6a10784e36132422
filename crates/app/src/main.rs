use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AuthError, AuthService, Clock, ParentService, PracticeConfig, PracticeService,
};
use spell_core::model::Role;
use ui::{App, UiApp, WebviewCelebration, WebviewSpeech, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://spelling.sqlite3";

const DEMO_PARENT_EMAIL: &str = "parent@example.com";
const DEMO_CHILD_NAME: &str = "Maya";
const DEMO_CHILD_EMAIL: &str = "maya@example.com";
const DEMO_PASSWORD: &str = "practice";
const DEMO_LIST_NAME: &str = "Week 1";
const DEMO_WORDS: &str = "cat, dog, fish, bird, house";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    speech: Arc<WebviewSpeech>,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn parent(&self) -> Arc<ParentService> {
        self.services.parent()
    }

    fn practice(&self) -> Arc<PracticeService> {
        self.services.practice()
    }

    fn speech(&self) -> Arc<WebviewSpeech> {
        Arc::clone(&self.speech)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SPELL_DB_URL, SPELL_REVEAL_DELAY_MS, SPELL_VOICE_LOCALE,");
    eprintln!("  SPELL_VOICE_REFRESH, SPELL_PERSIST_POLICY, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url.map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter(), std::env::var("SPELL_DB_URL").ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let config = PracticeConfig::from_env();
    let speech = Arc::new(WebviewSpeech::new());
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::system(),
        config,
        speech.clone(),
        Arc::new(WebviewCelebration),
    )
    .await?;
    tracing::info!(db = %parsed.db_url, command = ?cmd, "storage ready");

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services, speech });
            let context = build_app_context(&app);

            // Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Spelling Practice")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            seed_demo(&services).await?;
            eprintln!("seeded demo data into {}", parsed.db_url);
            eprintln!("  parent: {DEMO_PARENT_EMAIL} / {DEMO_PASSWORD}");
            eprintln!("  child:  {DEMO_CHILD_EMAIL} / {DEMO_PASSWORD}");
            Ok(())
        }
    }
}

/// Create a demo parent, a child account with a matching child profile, and
/// one word list. Re-running leaves existing accounts and children alone.
async fn seed_demo(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let auth = services.auth();
    for (email, role) in [
        (DEMO_PARENT_EMAIL, Role::Parent),
        (DEMO_CHILD_EMAIL, Role::Child),
    ] {
        match auth.sign_up(email, DEMO_PASSWORD, role).await {
            Ok(_) => tracing::info!(email, %role, "demo account created"),
            Err(AuthError::EmailInUse) => tracing::info!(email, "demo account already exists"),
            Err(err) => return Err(err.into()),
        }
    }

    let parent = services.parent();
    let existing = parent
        .list_children()
        .await?
        .into_iter()
        .find(|child| child.answers_to(DEMO_CHILD_NAME));
    let child_id = match existing {
        Some(child) if child.word_list.is_some() => {
            tracing::info!(child_id = %child.id, "demo child already has a word list");
            return Ok(());
        }
        Some(child) => child.id,
        None => parent.add_child(DEMO_CHILD_NAME).await?,
    };
    parent
        .assign_word_list(child_id, DEMO_LIST_NAME, DEMO_WORDS)
        .await?;
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "exiting");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::{NoCelebration, SilentSpeech};
    use spell_core::model::Email;

    fn args(items: &[&str]) -> impl Iterator<Item = String> {
        items
            .iter()
            .map(|s| (*s).to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn db_flag_overrides_env_and_default() {
        let parsed = Args::parse(&mut args(&[]), None).unwrap();
        assert_eq!(parsed.db_url, DEFAULT_DB_URL);

        let parsed = Args::parse(&mut args(&[]), Some("sqlite:///tmp/env.db".into())).unwrap();
        assert_eq!(parsed.db_url, "sqlite:///tmp/env.db");

        let parsed = Args::parse(
            &mut args(&["--db", "sqlite:///tmp/flag.db"]),
            Some("sqlite:///tmp/env.db".into()),
        )
        .unwrap();
        assert_eq!(parsed.db_url, "sqlite:///tmp/flag.db");
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(matches!(
            Args::parse(&mut args(&["--db"]), None),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            Args::parse(&mut args(&["--db", "  "]), None),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
        assert!(matches!(
            Args::parse(&mut args(&["--verbose"]), None),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/spell.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/spell.db"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }

    #[tokio::test]
    async fn seeding_is_repeatable() {
        let services = AppServices::in_memory(
            Clock::system(),
            PracticeConfig::default(),
            Arc::new(SilentSpeech),
            Arc::new(NoCelebration),
        );
        seed_demo(&services).await.unwrap();
        seed_demo(&services).await.unwrap();

        let role = services
            .auth()
            .sign_in(DEMO_CHILD_EMAIL, DEMO_PASSWORD)
            .await
            .unwrap();
        assert_eq!(role, Role::Child);

        let children = services.parent().list_children().await.unwrap();
        assert_eq!(children.len(), 1);

        let child = services
            .practice()
            .find_child_for(&Email::parse(DEMO_CHILD_EMAIL).unwrap())
            .await
            .unwrap();
        assert_eq!(child.word_list.unwrap().len(), 5);
    }
}
