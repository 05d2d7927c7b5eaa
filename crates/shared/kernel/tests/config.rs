use rsvp_kernel::config::load_config;
use rsvp_kernel::domain::config::ApiConfig;
use std::io::Write;

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg: ApiConfig = load_config(Some(dir.path().join("absent"))).unwrap();

    assert_eq!(cfg.server.port, 4583);
    assert_eq!(cfg.database.url, "mem://");
}

#[test]
fn toml_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9000

[database]
namespace = "wedding"
database = "guests"

[security]
service_key = "from-file"

[security.identity.jwt]
issuer = "auth.example"
"#
    )
    .unwrap();

    let cfg: ApiConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.database.namespace, "wedding");
    assert_eq!(cfg.database.url, "mem://");
    assert_eq!(cfg.security.service_key, "from-file");
    assert_eq!(cfg.security.identity.jwt.issuer, "auth.example");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    std::fs::write(&path, "[server]\nport = \"not a port\"\n").unwrap();

    assert!(load_config::<ApiConfig>(Some(&path)).is_err());
}
