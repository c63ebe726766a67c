//! serverconf command-line tool.
//!
//! Inspects and edits the local server configuration file through the same
//! [`SettingsStore`] the host application uses.
//!
//! # Usage
//!
//! ```text
//! serverconf [OPTIONS] <COMMAND>
//!
//! Commands:
//!   path                          Print the configuration file path
//!   show [SECTION]                Print the file, or one section
//!   get <SECTION> <KEY>           Print one stored value
//!   set <SECTION> <KEY> <VALUE>   Store a value (checked with --kind)
//!   load <SECTION> --field ...    Resolve a section through a schema
//!
//! Options:
//!   --settings-file <PATH>   Host settings file [env: SERVERCONF_SETTINGS_FILE]
//!   --organization <ORG>     Organization used for the platform lookup
//!   --application <APP>      Application used for the platform lookup
//! ```
//!
//! Log output goes to stderr; the level is controlled by `RUST_LOG`.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use serverconf::application::settings_store::{ConfigBackend, SettingsStore};
use serverconf::infrastructure::storage::file::FileBackend;
use serverconf::infrastructure::storage::location::{
    FixedSettingsLocator, PlatformSettingsLocator, SettingsLocator, DEFAULT_APPLICATION,
    DEFAULT_ORGANIZATION,
};
use serverconf_core::{serialize, IniDocument, SettingKind, SettingValue, Settings, SettingsSchema};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and edit the local server configuration file.
#[derive(Debug, Parser)]
#[command(name = "serverconf", version)]
struct Cli {
    /// Host application settings file; the configuration file is placed in
    /// the same directory.  Overrides the platform lookup.
    #[arg(long, env = "SERVERCONF_SETTINGS_FILE")]
    settings_file: Option<PathBuf>,

    /// Organization name for the platform settings lookup.
    #[arg(long, default_value = DEFAULT_ORGANIZATION)]
    organization: String,

    /// Application name for the platform settings lookup.
    #[arg(long, default_value = DEFAULT_APPLICATION)]
    application: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the configuration file path.
    Path,
    /// Print the whole file, or a single section.
    Show { section: Option<String> },
    /// Print one stored value.
    Get { section: String, key: String },
    /// Store one value.
    Set {
        section: String,
        key: String,
        value: String,
        /// Kind the value must parse as: int, bool, float, or string.
        #[arg(long, default_value = "string")]
        kind: SettingKind,
    },
    /// Resolve a section through a schema and write the result back.
    Load {
        section: String,
        /// Field declaration `NAME:KIND=DEFAULT`, e.g. `port:int=3080`.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<FieldArg>,
        /// Print the resolved settings as a JSON object.
        #[arg(long)]
        json: bool,
    },
}

/// One `--field` declaration.
#[derive(Debug, Clone)]
struct FieldArg {
    name: String,
    kind: SettingKind,
    default: SettingValue,
}

fn parse_field(text: &str) -> Result<FieldArg, String> {
    let (decl, default) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME:KIND=DEFAULT, got {text:?}"))?;
    let (name, kind) = decl
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:KIND=DEFAULT, got {text:?}"))?;
    let kind: SettingKind = kind.parse().map_err(|e| format!("{e}"))?;
    let default = kind
        .coerce(default)
        .map_err(|e| format!("default for {name:?}: {e}"))?;
    Ok(FieldArg {
        name: name.trim().to_string(),
        kind,
        default,
    })
}

impl Cli {
    fn locator(&self) -> Box<dyn SettingsLocator> {
        match &self.settings_file {
            Some(path) => Box::new(FixedSettingsLocator(path.clone())),
            None => Box::new(PlatformSettingsLocator::new(
                self.organization.clone(),
                self.application.clone(),
            )),
        }
    }
}

// ── Command execution ─────────────────────────────────────────────────────────

fn execute<B: ConfigBackend>(
    command: Command,
    store: &mut SettingsStore<B>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Path => {
            writeln!(out, "{}", store.path().display())?;
        }
        Command::Show { section: None } => {
            write!(out, "{}", serialize(store.document()))?;
        }
        Command::Show {
            section: Some(name),
        } => {
            let Some(section) = store.section(&name) else {
                bail!("no section [{name}] in {}", store.path().display());
            };
            let mut single = IniDocument::new();
            *single.ensure_section(&name) = section.clone();
            write!(out, "{}", serialize(&single))?;
        }
        Command::Get { section, key } => match store.get_raw(&section, &key) {
            Some(value) => writeln!(out, "{value}")?,
            None => bail!("no value for {key:?} in [{section}]"),
        },
        Command::Set {
            section,
            key,
            value,
            kind,
        } => {
            let value = kind
                .coerce(&value)
                .with_context(|| format!("value for {key:?} is not a valid {kind}"))?;
            store
                .save_settings(&section, &Settings::new().with(&key, value))
                .context("failed to save the configuration")?;
        }
        Command::Load {
            section,
            fields,
            json,
        } => {
            let mut schema = SettingsSchema::new();
            for field in fields {
                schema.push(&field.name, field.kind, field.default)?;
            }
            let settings = store.load_settings(&section, &schema)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
            } else {
                for (name, value) in settings.iter() {
                    writeln!(out, "{name} = {value}")?;
                }
            }
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Level is overridden by `RUST_LOG`.  Logs go to stderr so command output
    // on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let backend = FileBackend::from_locator(cli.locator().as_ref())
        .context("could not locate the configuration file")?;
    debug!("using configuration file {}", backend.location().display());

    let mut store = SettingsStore::open(backend);
    let stdout = io::stdout();
    execute(cli.command, &mut store, &mut stdout.lock())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
