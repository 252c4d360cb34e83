use std::fs;
use std::path::PathBuf;
use tempo_rates::TempoError;
use tempo_rates::config::{CONFIG_FILE_ENV, Config, DEFAULT_CONFIG_FILE, PORT_ENV};

const VALID_YAML: &str = r#"
clientid: abc
clientsecret: def
prices:
  blue: { peak: 0.1609, off-peak: 0.1296 }
  white: { peak: 0.1894, off-peak: 0.1486 }
  red: { peak: 0.7562, off-peak: 0.1568 }
"#;

fn set_env(key: &str, value: &str) {
    // Only this test mutates the environment of this test binary
    unsafe { std::env::set_var(key, value) }
}

fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

// Environment variables are process-wide, so every case runs in one test
#[test]
fn load_follows_environment() {
    let tmp_dir = tempfile::tempdir().unwrap();

    // Default location when the variable is unset or empty
    remove_env(CONFIG_FILE_ENV);
    assert_eq!(Config::resolve_path(), PathBuf::from(DEFAULT_CONFIG_FILE));
    set_env(CONFIG_FILE_ENV, "");
    assert_eq!(Config::resolve_path(), PathBuf::from(DEFAULT_CONFIG_FILE));

    // Valid file selected through CONFIG_FILE
    let valid = tmp_dir.path().join("valid.yaml");
    fs::write(&valid, VALID_YAML).unwrap();
    set_env(CONFIG_FILE_ENV, valid.to_str().unwrap());
    remove_env(PORT_ENV);
    assert_eq!(Config::resolve_path(), valid);
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.client_id, "abc");
    assert_eq!(cfg.web.port, 8080);

    // PORT overrides the configured port; unparsable values are ignored
    set_env(PORT_ENV, "9191");
    assert_eq!(Config::load().unwrap().web.port, 9191);
    set_env(PORT_ENV, "not-a-port");
    assert_eq!(Config::load().unwrap().web.port, 8080);
    remove_env(PORT_ENV);

    // Missing colour is a fatal configuration error
    let incomplete = tmp_dir.path().join("incomplete.yaml");
    fs::write(
        &incomplete,
        "clientid: abc\nclientsecret: def\nprices:\n  blue: { peak: 0.1, off-peak: 0.1 }\n",
    )
    .unwrap();
    set_env(CONFIG_FILE_ENV, incomplete.to_str().unwrap());
    let err = Config::load().unwrap_err();
    assert!(matches!(err, TempoError::Config { .. }));
    assert!(err.to_string().contains("prices.white"));

    // Missing file is fatal too
    set_env(CONFIG_FILE_ENV, tmp_dir.path().join("absent.yaml").to_str().unwrap());
    let err = Config::load().unwrap_err();
    assert!(matches!(err, TempoError::Config { .. }));
    assert!(err.to_string().contains("absent.yaml"));

    remove_env(CONFIG_FILE_ENV);
}
