//! Integration tests for the settings store against real files.
//!
//! Each test works in its own scratch directory under the system temp dir and
//! drives the store through its public API the way the host application does:
//! open once, load sections through schemas, save changed values.

use std::fs;
use std::path::PathBuf;

use serverconf::application::settings_store::{SettingsStore, StoreError};
use serverconf::infrastructure::storage::file::FileBackend;
use serverconf::infrastructure::storage::location::{config_file_name, FixedSettingsLocator};
use serverconf::infrastructure::storage::memory::MemoryBackend;
use serverconf_core::{SettingKind, SettingValue, Settings, SettingsSchema};
use uuid::Uuid;

struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("serverconf_it_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        Self { dir }
    }

    fn open(&self) -> SettingsStore<FileBackend> {
        let locator = FixedSettingsLocator(self.dir.join("App.conf"));
        SettingsStore::open(FileBackend::from_locator(&locator).expect("locate"))
    }

    fn config_text(&self) -> String {
        fs::read_to_string(self.dir.join(config_file_name())).expect("read config")
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.dir).ok();
    }
}

#[test]
fn test_open_creates_config_file_next_to_settings_file() {
    // Arrange
    let scratch = Scratch::new();

    // Act
    let store = scratch.open();

    // Assert
    assert_eq!(store.path(), scratch.dir.join(config_file_name()));
    assert!(store.path().exists());
    assert_eq!(scratch.config_text(), "");
}

#[test]
fn test_missing_integer_default_is_returned_and_written() {
    // Arrange
    let scratch = Scratch::new();
    let mut store = scratch.open();
    let schema = SettingsSchema::new().integer("x", 5).expect("schema");

    // Act
    let settings = store.load_settings("section", &schema).expect("load");

    // Assert
    assert_eq!(settings.get_i64("x"), Some(5));
    assert_eq!(scratch.config_text(), "[section]\nx = 5\n\n");
}

#[test]
fn test_unknown_section_with_empty_schema_writes_header() {
    let scratch = Scratch::new();
    let mut store = scratch.open();

    store
        .load_settings("Brand New", &SettingsSchema::new())
        .expect("load");

    assert!(scratch.config_text().contains("[Brand New]"));
}

#[test]
fn test_saved_values_load_back_for_every_kind() {
    // Arrange
    let scratch = Scratch::new();
    let cases = [
        ("count", SettingKind::Integer, SettingValue::Integer(0), SettingValue::Integer(-12)),
        ("enabled", SettingKind::Boolean, SettingValue::Boolean(false), SettingValue::Boolean(true)),
        ("ratio", SettingKind::Float, SettingValue::Float(0.0), SettingValue::Float(0.75)),
        (
            "path",
            SettingKind::String,
            SettingValue::String(String::new()),
            SettingValue::String("/var/lib/images".into()),
        ),
    ];

    for (name, kind, default, saved) in cases {
        // Act
        scratch
            .open()
            .save_settings("RoundTrip", &Settings::new().with(name, saved.clone()))
            .expect("save");
        let schema = SettingsSchema::new().field(name, kind, default).expect("schema");
        let loaded = scratch.open().load_settings("RoundTrip", &schema).expect("load");

        // Assert
        assert_eq!(loaded.get(name), Some(&saved), "{name}");
    }
}

#[test]
fn test_values_persist_across_reopen() {
    // Arrange
    let scratch = Scratch::new();
    let schema = SettingsSchema::new()
        .string("host", "127.0.0.1")
        .and_then(|s| s.integer("port", 3080))
        .expect("schema");
    {
        let mut store = scratch.open();
        store.load_settings("Server", &schema).expect("load");
        store
            .save_settings("Server", &Settings::new().with("port", 8000))
            .expect("save");
    }

    // Act
    let mut reopened = scratch.open();
    let settings = reopened.load_settings("Server", &schema).expect("load");

    // Assert
    assert_eq!(settings.get_i64("port"), Some(8000));
    assert_eq!(settings.get_str("host"), Some("127.0.0.1"));
}

#[test]
fn test_corrupt_file_opens_empty_and_is_replaced_on_save() {
    // Arrange
    let scratch = Scratch::new();
    fs::write(scratch.dir.join(config_file_name()), "no section here = 1\n").unwrap();

    // Act
    let mut store = scratch.open();

    // Assert
    assert!(store.document().is_empty());
    assert!(matches!(store.read_config(), Err(StoreError::Parse { .. })));

    store
        .save_settings("Server", &Settings::new().with("port", 1))
        .expect("save");
    assert_eq!(scratch.config_text(), "[Server]\nport = 1\n\n");
}

#[test]
fn test_value_with_blank_lines_does_not_cost_other_sections() {
    // Arrange
    let scratch = Scratch::new();
    fs::write(scratch.dir.join(config_file_name()), "[Other]\nkeep = 1\n").unwrap();
    scratch
        .open()
        .save_settings("Server", &Settings::new().with("motd", "a\n\nb"))
        .expect("save");

    // Act
    let mut reopened = scratch.open();
    let schema = SettingsSchema::new().integer("port", 1).expect("schema");
    reopened.load_settings("Server", &schema).expect("load");

    // Assert
    assert_eq!(reopened.get_raw("Other", "keep"), Some("1"));
    assert_eq!(reopened.get_raw("Server", "motd"), Some("a\n\nb"));
    assert_eq!(
        scratch.config_text(),
        "[Other]\nkeep = 1\n\n[Server]\nmotd = a\n\t\n\tb\nport = 1\n\n"
    );
}

#[test]
fn test_unstorable_key_is_refused_and_file_is_untouched() {
    let scratch = Scratch::new();
    fs::write(scratch.dir.join(config_file_name()), "[Other]\nkeep = 1\n").unwrap();
    let mut store = scratch.open();

    let result = store.save_settings("Server", &Settings::new().with("", "x"));

    assert!(matches!(result, Err(StoreError::InvalidName(_))));
    assert_eq!(scratch.config_text(), "[Other]\nkeep = 1\n");
    assert_eq!(scratch.open().sections(), vec!["Other"]);
}

#[test]
fn test_hand_edited_value_is_picked_up_by_read_config() {
    let scratch = Scratch::new();
    let mut store = scratch.open();
    store
        .save_settings("Server", &Settings::new().with("port", 1))
        .expect("save");

    fs::write(store.path(), "[Server]\nport = 2\n").unwrap();
    store.read_config().expect("read");

    assert_eq!(store.get_raw("Server", "port"), Some("2"));
}

#[test]
fn test_unwritable_store_keeps_last_persisted_state() {
    // Arrange
    let backend = MemoryBackend::missing("server.conf");
    let mut store = SettingsStore::open(backend.clone());
    store
        .save_settings("Server", &Settings::new().with("port", 1))
        .expect("save");
    backend.fail_writes(true);

    // Act
    let write = store.save_settings("Server", &Settings::new().with("port", 2));
    let read = store.read_config();

    // Assert
    assert!(write.is_err());
    assert!(read.is_ok());
    assert_eq!(store.get_raw("Server", "port"), Some("1"));
}

#[test]
fn test_unwritable_store_with_nothing_persisted_reads_empty() {
    let backend = MemoryBackend::missing("server.conf");
    backend.fail_writes(true);
    let mut store = SettingsStore::open(backend);

    store.set_raw("Server", "port", "2").expect("set");
    assert!(store.write_config().is_err());
    store.read_config().expect("read");

    assert!(store.document().is_empty());
}

#[test]
fn test_shared_handle_is_one_store() {
    // Arrange
    let scratch = Scratch::new();
    let shared = scratch.open().into_shared();
    let consumer_a = std::sync::Arc::clone(&shared);
    let consumer_b = std::sync::Arc::clone(&shared);

    // Act
    consumer_a
        .lock()
        .unwrap()
        .save_settings("Server", &Settings::new().with("host", "0.0.0.0"))
        .expect("save");

    // Assert
    let store = consumer_b.lock().unwrap();
    assert_eq!(store.get_raw("Server", "host"), Some("0.0.0.0"));
}
