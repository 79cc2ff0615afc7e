//! Error reports and log output for the binaries.

use crate::Environment;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Workspace crates log at `info` in production; dependencies stay at `warn`.
const PRODUCTION_DIRECTIVES: &str = "warn,products_api=info,domain_products=info,\
     axum_helpers=info,database=info,migration=info,tower_http=info,sqlx=warn";

const DEVELOPMENT_DIRECTIVES: &str = "info,products_api=debug,domain_products=debug,\
     axum_helpers=debug,database=debug,tower_http=debug,sea_orm=info,sqlx=warn";

/// Install color-eyre; harmless if a hook is already set.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => PRODUCTION_DIRECTIVES,
        Environment::Development => DEVELOPMENT_DIRECTIVES,
    }
}

/// Install the global subscriber: flattened JSON lines in production,
/// pretty output in development, span traces for eyre reports in both.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(environment: &Environment) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let json = environment.is_production().then(|| {
        fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
    });
    let pretty = environment.is_development().then(|| {
        fmt::layer()
            .pretty()
            .with_file(false)
            .with_line_number(false)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(ErrorLayer::default())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(?environment, "Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for env in [Environment::Development, Environment::Production] {
            assert!(EnvFilter::try_new(default_directives(&env)).is_ok());
        }
    }

    #[test]
    fn test_production_keeps_service_crates_at_info() {
        let directives = default_directives(&Environment::Production);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("domain_products=info"));
        assert!(directives.contains("products_api=info"));
    }

    #[test]
    fn test_second_init_is_ignored() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
            assert!(!init_tracing(&Environment::Development));
        });
    }
}
