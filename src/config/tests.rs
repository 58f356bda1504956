use super::{PartialHubSettings, PartialSettings, Settings, load_config};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.addr(), "127.0.0.1:8080");
    assert_eq!(settings.hub.default_topic, "chat");
    assert_eq!(settings.hub.outbound_buffer, 64);
    assert_eq!(settings.hub.write_timeout().as_millis(), 5000);
    assert_eq!(settings.hub.max_message_len, 4096);
    assert_eq!(settings.log.level, "info");
}

#[test]
fn test_topic_or_default() {
    let mut hub = Settings::default().hub;
    assert_eq!(hub.topic_or_default(None), "chat");
    assert_eq!(hub.topic_or_default(Some("  ".to_string())), "chat");
    assert_eq!(hub.topic_or_default(Some("random".to_string())), "random");

    hub.default_topic = "lobby".to_string();
    assert_eq!(hub.topic_or_default(None), "lobby");
}

#[test]
#[serial]
fn configured_default_topic_reaches_client_topic() {
    temp_env::with_var("CHATHUB_HUB__DEFAULT_TOPIC", Some("lobby"), || {
        let cfg = load_config().expect("load_config failed");
        assert_eq!(cfg.hub.topic_or_default(None), "lobby");
        assert_eq!(cfg.hub.topic_or_default(Some("chat".to_string())), "chat");
    });
}

#[test]
fn test_merge_keeps_defaults_for_missing_sections() {
    let partial = PartialSettings {
        server: None,
        hub: Some(PartialHubSettings {
            default_topic: Some("lobby".to_string()),
            outbound_buffer: Some(0),
            write_timeout_ms: None,
            max_message_len: None,
        }),
        log: None,
    };

    let merged = partial.merge(Settings::default());
    assert_eq!(merged.server.port, 8080);
    assert_eq!(merged.hub.default_topic, "lobby");
    // zero is not a usable queue capacity
    assert_eq!(merged.hub.outbound_buffer, 64);
    assert_eq!(merged.log.level, "info");
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [hub]
        default_topic = "general"
        outbound_buffer = 8

        [log]
        level = "debug"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.hub.default_topic, "general");
    assert_eq!(cfg.hub.outbound_buffer, 8);
    assert_eq!(cfg.hub.write_timeout_ms, 5000);
    assert_eq!(cfg.log.level, "debug");
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    temp_env::with_vars(
        [
            ("CHATHUB_SERVER__PORT", Some("9100")),
            ("CHATHUB_HUB__MAX_MESSAGE_LEN", Some("32")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.port, 9100);
            assert_eq!(cfg.hub.max_message_len, 32);
            assert_eq!(cfg.server.host, "127.0.0.1");
        },
    );
}
