// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod sink;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;
use tracker::{NoProgramRules, NotificationSideEffectHandler, ValidationConfig};
use tracker_api::{TrackerImportParams, TrackerImportService};
use tracker_domain::{
    AtomicMode, FlushMode, TrackerBundleMode, TrackerIdSchemeParam, TrackerImportStrategy,
    ValidationMode,
};
use tracker_persistence::{CommitConfig, InMemoryStore, StoreSnapshot};
use tracker_report::{TrackerImportReport, TrackerStatus};

use crate::sink::LoggingNotificationSink;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(args.env_filter())
        .with_writer(std::io::stderr)
        .init();

    match args.run() {
        Ok(TrackerStatus::Error) => std::process::exit(2),
        Ok(_) => (),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Imports a tracker payload into a store read from a JSON fixture and
/// prints the import report.
///
/// Flags given on the command line override the ones in the payload.
#[derive(Debug, Parser)]
#[command(name = "tracker-import", author, version, about, long_about = None)]
struct Args {
    /// Path to the import payload (JSON)
    #[arg(short, long)]
    payload: PathBuf,

    /// Path to the store snapshot (JSON). Starts from an empty store if omitted.
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Write the store snapshot after the import to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// COMMIT or VALIDATE
    #[arg(long)]
    import_mode: Option<TrackerBundleMode>,

    /// CREATE, UPDATE, CREATE_AND_UPDATE or DELETE
    #[arg(long)]
    import_strategy: Option<TrackerImportStrategy>,

    /// FULL, FAIL_FAST or SKIP
    #[arg(long)]
    validation_mode: Option<ValidationMode>,

    /// AUTO or OBJECT
    #[arg(long)]
    flush_mode: Option<FlushMode>,

    /// ALL or OBJECT
    #[arg(long)]
    atomic_mode: Option<AtomicMode>,

    /// Do not run side-effect handlers after persisting
    #[arg(long)]
    skip_side_effects: bool,

    /// Do not evaluate program rules
    #[arg(long)]
    skip_rule_engine: bool,

    /// Uid of the acting user. Defaults to the store's current user.
    #[arg(short, long)]
    user: Option<String>,

    /// UID, CODE, NAME or ATTRIBUTE:<uid>
    #[arg(long)]
    id_scheme: Option<TrackerIdSchemeParam>,

    /// Scheme for organisation units, defaults to --id-scheme
    #[arg(long)]
    org_unit_id_scheme: Option<TrackerIdSchemeParam>,

    /// Scheme for programs, defaults to --id-scheme
    #[arg(long)]
    program_id_scheme: Option<TrackerIdSchemeParam>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    /// `RUST_LOG` wins over the verbosity flags.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level().to_string()))
    }

    /// Applies the command line flags on top of the payload's own.
    fn apply(&self, mut params: TrackerImportParams) -> TrackerImportParams {
        if let Some(import_mode) = self.import_mode {
            params.import_mode = import_mode;
        }
        if let Some(import_strategy) = self.import_strategy {
            params.import_strategy = import_strategy;
        }
        if let Some(validation_mode) = self.validation_mode {
            params.validation_mode = validation_mode;
        }
        if let Some(flush_mode) = self.flush_mode {
            params.flush_mode = flush_mode;
        }
        if let Some(atomic_mode) = self.atomic_mode {
            params.atomic_mode = atomic_mode;
        }
        params.skip_side_effects |= self.skip_side_effects;
        params.skip_rule_engine |= self.skip_rule_engine;
        if let Some(user) = &self.user {
            params.user = None;
            params.user_id = Some(user.clone());
        }
        if let Some(id_scheme) = &self.id_scheme {
            params.identifiers.id_scheme = id_scheme.clone();
        }
        if let Some(scheme) = &self.org_unit_id_scheme {
            params.identifiers.org_unit_id_scheme = Some(scheme.clone());
        }
        if let Some(scheme) = &self.program_id_scheme {
            params.identifiers.program_id_scheme = Some(scheme.clone());
        }
        params
    }

    fn load_store(&self) -> Result<InMemoryStore> {
        let Some(path) = &self.store else {
            info!("No store fixture given, starting from an empty store");
            return Ok(InMemoryStore::new());
        };
        let json: String = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read store fixture {}", path.display()))?;
        let snapshot: StoreSnapshot = StoreSnapshot::from_json(&json)
            .wrap_err_with(|| format!("Invalid store fixture {}", path.display()))?;
        Ok(InMemoryStore::from_snapshot(snapshot))
    }

    fn run(&self) -> Result<TrackerStatus> {
        let json: String = std::fs::read_to_string(&self.payload)
            .wrap_err_with(|| format!("Failed to read payload {}", self.payload.display()))?;
        let params: TrackerImportParams = self.apply(
            TrackerImportParams::from_json(&json)
                .wrap_err_with(|| format!("Invalid payload {}", self.payload.display()))?,
        );

        let service: TrackerImportService<InMemoryStore> = TrackerImportService::new(
            self.load_store()?,
            NoProgramRules,
            ValidationConfig::default(),
            CommitConfig {
                bundle_hooks: Vec::new(),
                side_effect_handlers: vec![Box::new(NotificationSideEffectHandler::new(
                    LoggingNotificationSink,
                ))],
            },
        );
        let report: TrackerImportReport = service.import(params)?;
        println!("{}", serde_json::to_string_pretty(&report)?);

        if let Some(path) = &self.output {
            let snapshot: String = service.store().snapshot()?.to_json()?;
            std::fs::write(path, snapshot)
                .wrap_err_with(|| format!("Failed to write store snapshot {}", path.display()))?;
            info!(path = %path.display(), "Store snapshot written");
        }
        Ok(report.status)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tracker-import").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_payload_is_required() {
        assert!(Args::try_parse_from(["tracker-import"]).is_err());
    }

    #[test]
    fn test_modes_use_wire_names() {
        let args: Args = parse(&[
            "--payload",
            "payload.json",
            "--import-mode",
            "VALIDATE",
            "--import-strategy",
            "create_and_update",
            "--atomic-mode",
            "ALL",
            "--id-scheme",
            "ATTRIBUTE:AttrCode001",
        ]);

        assert_eq!(args.import_mode, Some(TrackerBundleMode::Validate));
        assert_eq!(
            args.import_strategy,
            Some(TrackerImportStrategy::CreateAndUpdate)
        );
        assert_eq!(args.atomic_mode, Some(AtomicMode::All));
        assert_eq!(
            args.id_scheme,
            Some(TrackerIdSchemeParam::of_attribute("AttrCode001"))
        );
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: Result<Args, clap::Error> = Args::try_parse_from([
            "tracker-import",
            "--payload",
            "payload.json",
            "--flush-mode",
            "SOMETIMES",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_the_payload() {
        let args: Args = parse(&[
            "--payload",
            "payload.json",
            "--validation-mode",
            "FAIL_FAST",
            "--skip-rule-engine",
            "--user",
            "ClerkUid001",
            "--org-unit-id-scheme",
            "CODE",
        ]);
        let payload: TrackerImportParams = TrackerImportParams {
            user_id: Some(String::from("UserUid0001")),
            flush_mode: FlushMode::Object,
            ..TrackerImportParams::default()
        };

        let params: TrackerImportParams = args.apply(payload);

        assert_eq!(params.validation_mode, ValidationMode::FailFast);
        assert_eq!(params.flush_mode, FlushMode::Object);
        assert!(params.skip_rule_engine);
        assert!(!params.skip_side_effects);
        assert_eq!(params.user_id.as_deref(), Some("ClerkUid001"));
        assert_eq!(
            params.identifiers.org_unit_id_scheme,
            Some(TrackerIdSchemeParam::CODE)
        );
        assert_eq!(params.identifiers.id_scheme, TrackerIdSchemeParam::UID);
    }

    #[test]
    fn test_verbosity_sets_log_level() {
        let quiet: Args = parse(&["--payload", "payload.json", "-q"]);
        let verbose: Args = parse(&["--payload", "payload.json", "-vv"]);

        assert_eq!(quiet.log_level(), LevelFilter::WARN);
        assert_eq!(verbose.log_level(), LevelFilter::TRACE);
    }
}
