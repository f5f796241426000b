use std::{env, fs};

use tally_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("tally.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081

[backends]
directory_url = "http://localhost:9001/users"
events_url = "http://localhost:9002/events"
request_timeout_ms = 2000
page_size = 25

[redis]
enabled = false

[cache]
key = "usage"
ttl_secs = 3600

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.backends.page_size, 25);
    assert_eq!(cfg.cache.ttl_secs, 3600);
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");

    // 2) Env override should win over file
    unsafe {
        env::set_var("TALLY__CACHE__TTL_SECS", "7200");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.cache.ttl_secs, 7200);
    // cleanup env var
    unsafe {
        env::remove_var("TALLY__CACHE__TTL_SECS");
    }

    // 3) Defaults fill unspecified sections
    assert_eq!(cfg.cache.key, "usage");
    assert!(!cfg.redis.enabled);

    // 4) Invalid config (zero TTL) should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[backends]
directory_url = "http://localhost:9001/users"
events_url = "http://localhost:9002/events"

[cache]
ttl_secs = 0
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("cache.ttl_secs"));
}
