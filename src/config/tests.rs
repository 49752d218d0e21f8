use super::*;

#[test]
fn defaults_resolve_without_credentials() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert!(settings.carbone.api_key.is_none());
    assert!(settings.carbone.template_id.is_none());
    assert_eq!(settings.carbone.base_url.as_str(), "https://api.carbone.io/");
    assert_eq!(settings.carbone.version, "5");
    assert!(settings.carbone.timeout.is_none());
    assert_eq!(settings.assets.directory, PathBuf::from("public"));
    assert!(settings.assets.enabled);
    assert_eq!(settings.cors.allow_origin, "*");
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.carbone.template_id = Some("from-file".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        carbone_template_id: Some("from-cli".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.carbone.template_id.as_deref(), Some("from-cli"));
}

#[test]
fn blank_credentials_count_as_missing() {
    let mut raw = RawSettings::default();
    raw.carbone.api_key = Some("   ".to_string());
    raw.carbone.template_id = Some(String::new());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.carbone.api_key.is_none());
    assert!(settings.carbone.template_id.is_none());
}

#[test]
fn api_key_is_redacted_from_debug_output() {
    let mut raw = RawSettings::default();
    raw.carbone.api_key = Some("super-secret".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    let rendered = format!("{:?}", settings.carbone);
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn rejects_invalid_base_url() {
    let mut raw = RawSettings::default();
    raw.carbone.base_url = Some("not a url".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "carbone.base_url",
            ..
        }
    ));
}

#[test]
fn rejects_non_http_base_url() {
    let mut raw = RawSettings::default();
    raw.carbone.base_url = Some("ftp://api.example.com".to_string());

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn rejects_zero_port_and_zero_timeout() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.carbone.timeout_seconds = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn timeout_is_converted_to_duration() {
    let mut raw = RawSettings::default();
    raw.carbone.timeout_seconds = Some(15);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.carbone.timeout, Some(Duration::from_secs(15)));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn rejects_invalid_cors_origin() {
    let mut raw = RawSettings::default();
    raw.cors.allow_origin = Some("bad\norigin".to_string());

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["docrelay"]);
    assert!(args.command.unwrap_or(Command::Serve) == Command::Serve);
}

#[test]
fn parse_serve_overrides_after_subcommand() {
    let args = CliArgs::parse_from([
        "docrelay",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--carbone-template-id",
        "tpl-123",
        "--assets-enabled",
        "false",
    ]);

    assert_eq!(args.command, Some(Command::Serve));
    assert_eq!(args.overrides.server_host.as_deref(), Some("0.0.0.0"));
    assert_eq!(
        args.overrides.carbone_template_id.as_deref(),
        Some("tpl-123")
    );
    assert_eq!(args.overrides.assets_enabled, Some(false));
}

#[test]
fn parse_check_config_command() {
    let args = CliArgs::parse_from(["docrelay", "check-config", "--log-level", "warn"]);

    assert_eq!(args.command, Some(Command::CheckConfig));
    assert_eq!(args.overrides.log_level.as_deref(), Some("warn"));
}
