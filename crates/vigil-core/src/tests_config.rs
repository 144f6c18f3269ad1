#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::MonitorConfig;
    use crate::error::ConfigError;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn defaults_without_a_file() {
        let cfg = MonitorConfig::load(None).unwrap();
        assert_eq!(cfg, MonitorConfig::default());
    }

    #[test]
    fn file_layer_overrides_defaults() {
        let file = write_config(
            r#"
            response_limit = 9

            [cooling]
            hot_threshold = 120
            window_lo = 30
            window_hi = 50
            max_window_age = 20
            "#,
        );
        let cfg = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.response_limit, 9);
        assert_eq!(cfg.cooling.hot_threshold, 120);
        assert_eq!(cfg.cooling.max_window_age, 20);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let file = write_config("response_limit = 3\n");
        let cfg = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.response_limit, 3);
        assert_eq!(cfg.cooling, MonitorConfig::default().cooling);
    }

    #[test]
    fn invalid_values_fail_the_load() {
        let file = write_config(
            r#"
            [cooling]
            window_lo = 90
            window_hi = 10
            "#,
        );
        let err = MonitorConfig::load(Some(file.path())).unwrap_err();
        assert_eq!(err, ConfigError::InvertedWindow { lo: 90, hi: 10 });
    }

    #[test]
    fn template_round_trips_to_the_defaults() {
        let file = write_config(&MonitorConfig::template());
        let cfg = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg, MonitorConfig::default());
    }
}
