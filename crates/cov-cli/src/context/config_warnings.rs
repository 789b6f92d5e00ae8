use cov_config::CovConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CovConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CovConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.turso.is_configured() && has_env_prefix(&env_keys, "COVBOARD_TURSO") {
        warnings.push(
            "Turso config is incomplete while COVBOARD_TURSO* env vars exist; using the local database. Set both COVBOARD_TURSO__URL and COVBOARD_TURSO__AUTH_TOKEN."
                .to_string(),
        );
    }

    if !config.session.admin && has_single_underscore(&env_keys, "COVBOARD_SESSION") {
        warnings.push(
            "Session config appears default while COVBOARD_SESSION* env vars exist. Use double underscores (example: COVBOARD_SESSION__ADMIN)."
                .to_string(),
        );
    }

    if has_single_underscore(&env_keys, "COVBOARD_DASHBOARD") {
        warnings.push(
            "COVBOARD_DASHBOARD_* env vars are ignored. Use double underscores (example: COVBOARD_DASHBOARD__FAILED_PAGE_SIZE)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

/// `PREFIX_X` but not `PREFIX__X`.
fn has_single_underscore(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}

#[cfg(test)]
mod tests {
    use cov_config::{CovConfig, SessionConfig, TursoConfig};
    use pretty_assertions::assert_eq;

    use super::collect_unconfigured_warnings;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn warns_for_mistyped_sections() {
        let warnings = collect_unconfigured_warnings(
            &CovConfig::default(),
            env(&[
                ("COVBOARD_TURSO_URL", "libsql://demo"),
                ("COVBOARD_SESSION_ADMIN", "true"),
                ("COVBOARD_DASHBOARD_FAILED_PAGE_SIZE", "50"),
            ]),
        );

        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn half_configured_turso_warns() {
        let warnings = collect_unconfigured_warnings(
            &CovConfig::default(),
            env(&[("COVBOARD_TURSO__URL", "libsql://demo")]),
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("AUTH_TOKEN"));
    }

    #[test]
    fn does_not_warn_when_sections_are_configured() {
        let config = CovConfig {
            turso: TursoConfig {
                url: "libsql://demo".to_string(),
                auth_token: "token".to_string(),
            },
            session: SessionConfig {
                user: "ana".to_string(),
                admin: true,
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            env(&[
                ("COVBOARD_TURSO__URL", "libsql://demo"),
                ("COVBOARD_SESSION__ADMIN", "true"),
                ("COVBOARD_DASHBOARD__FAILED_PAGE_SIZE", "50"),
            ]),
        );

        assert!(warnings.is_empty());
    }
}
