use super::*;

// =============================================================
// ApiUrlSource::from_options
// =============================================================

#[test]
fn explicit_url_wins_over_page_url() {
    let source = ApiUrlSource::from_options(
        Some("http://api.test/".to_owned()),
        Some("http://page.test/chat".to_owned()),
        DEFAULT_API_PORT,
    )
    .unwrap();
    assert_eq!(source, ApiUrlSource::Explicit("http://api.test/".to_owned()));
}

#[test]
fn page_url_used_when_no_explicit_url() {
    let source =
        ApiUrlSource::from_options(None, Some("http://page.test/chat".to_owned()), 4100).unwrap();
    assert_eq!(
        source,
        ApiUrlSource::DeriveFromPage { page_url: "http://page.test/chat".to_owned(), port: 4100 }
    );
}

#[test]
fn missing_both_urls_errors() {
    let err = ApiUrlSource::from_options(None, None, DEFAULT_API_PORT).unwrap_err();
    assert!(matches!(err, ConfigError::MissingApiUrl));
}

// =============================================================
// resolve
// =============================================================

#[test]
fn derive_from_page_overrides_port_and_path() {
    let source = ApiUrlSource::DeriveFromPage {
        page_url: "http://chat.example.com:3000/rooms/main?tab=1#bottom".to_owned(),
        port: DEFAULT_API_PORT,
    };
    let url = source.resolve().unwrap();
    assert_eq!(url.to_string(), "http://chat.example.com:4000/");
}

#[test]
fn derive_from_page_adds_port_when_page_has_none() {
    let source = ApiUrlSource::DeriveFromPage {
        page_url: "https://chat.example.com/index.html".to_owned(),
        port: 4000,
    };
    assert_eq!(source.resolve().unwrap().to_string(), "https://chat.example.com:4000/");
}

#[test]
fn explicit_url_is_kept_as_is() {
    let source = ApiUrlSource::Explicit("https://api.example.com/board".to_owned());
    let url = source.resolve().unwrap();
    assert_eq!(url.as_url().path(), "/board");
    assert_eq!(url.as_url().host_str(), Some("api.example.com"));
}

#[test]
fn unparseable_url_errors() {
    let err = ApiUrlSource::Explicit("not a url".to_owned()).resolve().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}

#[test]
fn non_http_scheme_errors() {
    let err = ApiUrl::parse("ftp://files.example.com/").unwrap_err();
    assert!(err.to_string().contains("unsupported URL scheme"));
}

// =============================================================
// ClientConfig
// =============================================================

#[test]
fn client_config_defaults() {
    let cfg = ClientConfig::new(ApiUrl::parse("http://127.0.0.1:4000/").unwrap());
    assert_eq!(cfg.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
    assert_eq!(cfg.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
    assert_eq!(cfg.request_timeout, None);
}

#[test]
fn zero_poll_interval_is_rejected() {
    let cfg = ClientConfig::new(ApiUrl::parse("http://127.0.0.1:4000/").unwrap());
    let err = cfg.with_poll_interval(Duration::ZERO).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroPollInterval));
}

#[test]
fn overrides_apply() {
    let cfg = ClientConfig::new(ApiUrl::parse("http://127.0.0.1:4000/").unwrap())
        .with_poll_interval(Duration::from_millis(250))
        .unwrap()
        .with_connect_timeout(Duration::from_secs(3))
        .with_request_timeout(Some(Duration::from_millis(900)));
    assert_eq!(cfg.poll_interval, Duration::from_millis(250));
    assert_eq!(cfg.connect_timeout, Duration::from_secs(3));
    assert_eq!(cfg.request_timeout, Some(Duration::from_millis(900)));
}
