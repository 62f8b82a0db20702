use seva_config::{SevaConfig, StorageBackend};

const SECTIONS: [&str; 5] = ["DATABASE", "STORAGE", "SERVER", "AUTH", "GENERAL"];

/// Emit warnings for likely mistyped env var keys and throwaway storage.
pub fn warn_unconfigured(config: &SevaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SevaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    for section in SECTIONS {
        let single = format!("SEVA_{section}_");
        let double = format!("SEVA_{section}__");
        if let Some(key) = env_keys
            .iter()
            .find(|key| key.starts_with(&single) && !key.starts_with(&double))
        {
            warnings.push(format!(
                "{key} is ignored. Use double underscores between section and field (example: {double}{})",
                &key[single.len()..]
            ));
        }
    }

    if config.storage.backend == StorageBackend::Memory {
        warnings.push("storage.backend is memory: uploaded images are lost on exit".to_string());
    }
    if config.database.is_in_memory() {
        warnings.push("database.path is :memory: - records are lost on exit".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use seva_config::SevaConfig;

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_keys() {
        let config = SevaConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("SEVA_STORAGE_BUCKET".to_string(), "photos".to_string()),
                ("SEVA_SERVER__BIND".to_string(), "0.0.0.0:80".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("SEVA_STORAGE__BUCKET"));
    }

    #[test]
    fn default_config_with_clean_env_is_quiet() {
        let warnings = collect_unconfigured_warnings(
            &SevaConfig::default(),
            vec![("SEVA_DATABASE__PATH".to_string(), "seva.db".to_string())],
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn memory_backends_are_flagged() {
        let mut config = SevaConfig::default();
        config.storage.backend = seva_config::StorageBackend::Memory;
        config.database.path = ":memory:".into();
        let warnings = collect_unconfigured_warnings(&config, Vec::new());
        assert_eq!(warnings.len(), 2);
    }
}
