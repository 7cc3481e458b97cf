use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use notix::{Position, ToastDuration};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plays scripted toast scenarios on the console", long_about = None)]
pub struct Cli {
    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scénario à jouer.
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,

    /// Position par défaut de la pile (ex. "bottom-left").
    #[arg(long, value_name = "POSITION")]
    pub position: Option<Position>,

    /// Délai de fermeture auto par défaut : millisecondes, "4s" ou "none".
    #[arg(long, value_name = "DURATION")]
    pub duration: Option<ToastDuration>,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "notix=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Format d'affichage de chaque snapshot du store.
    #[arg(long, value_enum, default_value_t = SnapshotFormat::Text)]
    pub snapshot_format: SnapshotFormat,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Scenario {
    /// Fermeture auto avec une pause au milieu.
    Timed,
    /// Toast de chargement résolu par une future.
    Promise,
    /// Animations morph et fly ancrées.
    Morph,
    /// Toasts persistants et nettoyage par position.
    Sticky,
    All,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SnapshotFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Scenario, SnapshotFormat};
    use clap::Parser;
    use notix::{Position, ToastDuration};
    use std::time::Duration;

    #[test]
    fn defaults_play_everything_as_text() {
        let cli = Cli::try_parse_from(["notix"]).unwrap();
        assert_eq!(cli.scenario, Scenario::All);
        assert_eq!(cli.snapshot_format, SnapshotFormat::Text);
        assert!(cli.position.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let cli = Cli::try_parse_from([
            "notix",
            "--scenario",
            "promise",
            "--position",
            "bottom-left",
            "--duration",
            "2s",
            "--snapshot-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.scenario, Scenario::Promise);
        assert_eq!(cli.position, Some(Position::BottomLeft));
        assert_eq!(
            cli.duration,
            Some(ToastDuration::Finite(Duration::from_secs(2)))
        );
        assert_eq!(cli.snapshot_format, SnapshotFormat::Json);
    }

    #[test]
    fn unknown_position_is_rejected() {
        assert!(Cli::try_parse_from(["notix", "--position", "middle"]).is_err());
    }
}
