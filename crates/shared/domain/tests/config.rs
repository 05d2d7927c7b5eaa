use rsvp_domain::config::{ApiConfig, DatabaseConfig, SecurityConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "rsvp");
    assert_eq!(db.database, "wedding");
    assert!(db.credentials.is_none());

    let security = SecurityConfig::default();
    assert_eq!(security.identity.jwt.issuer, "rsvp");
    assert!(!security.service_key.is_empty());
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "mem://", "namespace": "n", "database": "d", "credentials": null },
        "security": { "service_key": "hook-secret", "identity": { "jwt": { "issuer": "auth" } } },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert_eq!(cfg.security.service_key, "hook-secret");
    assert_eq!(cfg.security.identity.jwt.issuer, "auth");
    assert_eq!(cfg.security.identity.jwt.leeway_seconds, 60);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert!(cfg.logging.directory.is_none());
}
