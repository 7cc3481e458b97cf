use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

const FALLBACK_FILTER: &str = "info";

/// Premier filtre valide parmi `explicit`, `RUST_LOG` puis `info`.
///
/// # Errors
///
/// Retourne [`Error::Telemetry`] si aucun candidat n'est valide, ce qui
/// n'arrive que si le filtre de repli lui-même est rejeté.
pub fn resolve_filter(explicit: Option<&str>) -> Result<EnvFilter> {
    explicit
        .map(str::to_owned)
        .into_iter()
        .chain(std::env::var("RUST_LOG").ok())
        .chain(std::iter::once(FALLBACK_FILTER.to_owned()))
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

/// Initialise tracing avec un filtre optionnel et un mode JSON conditionnel.
///
/// # Errors
///
/// Retourne [`Error::Telemetry`] si le JSON est demandé sans la feature
/// `json-logs`, ou si un subscriber global est déjà installé.
pub fn init_tracing(explicit_filter: Option<&str>, json: bool) -> Result<()> {
    let filter = resolve_filter(explicit_filter)?;

    #[cfg(feature = "json-logs")]
    if json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .flatten_event(true),
        );
        return tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()));
    }

    #[cfg(not(feature = "json-logs"))]
    if json {
        return Err(Error::Telemetry(
            "built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).compact());
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}
