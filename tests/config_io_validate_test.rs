use std::fs;
use tempo_rates::config::Config;

const VALID_YAML: &str = r#"
clientid: abc
clientsecret: def
prices:
  blue: { peak: 0.1609, off-peak: 0.1296 }
  white: { peak: 0.1894, off-peak: 0.1486 }
  red: { peak: 0.7562, off-peak: 0.1568 }
"#;

#[test]
fn load_yaml_from_file() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("evcc-tempo.yaml");
    fs::write(&path, VALID_YAML).unwrap();

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.client_id, "abc");
    assert_eq!(cfg.prices.blue.unwrap().peak, 0.1609);
    assert_eq!(cfg.timezone, "Europe/Paris");
    assert_eq!(cfg.web.port, 8080);
    assert!(cfg.validate().is_ok());
}

#[test]
fn nested_sections_override_defaults() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let yaml = format!(
        "{}\ntimezone: Europe/Brussels\nupstream:\n  base_url: http://localhost:1234\n  retry:\n    max_elapsed_ms: 5000\nweb:\n  port: 9090\n",
        VALID_YAML
    );
    fs::write(tmp.path(), yaml).unwrap();

    let cfg = Config::from_file(tmp.path()).unwrap();
    assert_eq!(cfg.timezone, "Europe/Brussels");
    assert_eq!(cfg.upstream.base_url, "http://localhost:1234");
    assert_eq!(cfg.upstream.retry.max_elapsed_ms, 5000);
    assert_eq!(cfg.upstream.retry.initial_interval_ms, 1000);
    assert_eq!(cfg.web.port, 9090);
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_colour_fails_validation() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        "clientid: abc\nclientsecret: def\nprices:\n  blue: { peak: 0.1, off-peak: 0.1 }\n  white: { peak: 0.1, off-peak: 0.1 }\n",
    )
    .unwrap();

    let cfg = Config::from_file(tmp.path()).unwrap();
    let msg = format!("{}", cfg.validate().unwrap_err());
    assert!(msg.contains("prices.red"));
}

#[test]
fn missing_file_is_io_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(tmp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{}", err).contains("I/O error"));
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"bad: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}
