use std::path::PathBuf;

use anyhow::Context;
use careerspan_analysis::config::AnalysisConfig;
use careerspan_stats::config::CiMethod;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{logging, util};

use self::{fit::FitArg, stratify::StratifyArg};

mod curve_csv;
mod fit;
mod stratify;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug-level progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit one Kaplan-Meier curve over the whole dataset
    Fit(#[clap(flatten)] FitArg),
    /// Fit one curve per group and compare them
    Stratify(#[clap(flatten)] StratifyArg),
}

/// Estimator options shared by every subcommand
#[derive(Debug, Clone, Args)]
pub(crate) struct EstimatorArg {
    /// Path to a JSON analysis config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Confidence level for the pointwise bands, overriding the config file
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Confidence band transform, overriding the config file
    #[arg(long, value_enum)]
    pub ci_method: Option<CiMethodArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CiMethodArg {
    Normal,
    #[value(name = "log-log")]
    LogLog,
}

impl From<CiMethodArg> for CiMethod {
    fn from(arg: CiMethodArg) -> Self {
        match arg {
            CiMethodArg::Normal => CiMethod::Normal,
            CiMethodArg::LogLog => CiMethod::LogLog,
        }
    }
}

impl EstimatorArg {
    /// Loads the config file (or defaults) and applies command-line overrides.
    pub(crate) fn load_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = util::read_config_file(self.config.as_deref())?;
        if let Some(level) = self.confidence_level {
            config.estimator = config.estimator.with_confidence_level(level);
        }
        if let Some(method) = self.ci_method {
            config.estimator = config.estimator.with_ci_method(method.into());
        }
        config
            .estimator
            .validate()
            .context("Invalid estimator configuration")?;

        tracing::debug!(
            confidence_level = config.estimator.confidence_level,
            ci_method = %config.estimator.ci_method,
            aliases = config.grouping.aliases.len(),
            excluded = config.grouping.exclude.len(),
            "resolved configuration"
        );
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(args.verbose);
    match args.mode {
        Mode::Fit(arg) => fit::run(&arg)?,
        Mode::Stratify(arg) => stratify::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = CommandArgs::try_parse_from([
            "careerspan",
            "fit",
            "data.json",
            "--confidence-level",
            "0.9",
            "--ci-method",
            "log-log",
        ])
        .unwrap();
        let Mode::Fit(arg) = args.mode else {
            panic!("expected fit subcommand");
        };
        let config = arg.estimator.load_config().unwrap();
        assert_eq!(config.estimator.confidence_level, 0.9);
        assert_eq!(config.estimator.ci_method, CiMethod::LogLog);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let args =
            CommandArgs::try_parse_from(["careerspan", "fit", "data.json", "--confidence-level", "1.5"])
                .unwrap();
        let Mode::Fit(arg) = args.mode else {
            panic!("expected fit subcommand");
        };
        assert!(arg.estimator.load_config().is_err());
    }

    #[test]
    fn test_unknown_ci_method_fails_to_parse() {
        let result =
            CommandArgs::try_parse_from(["careerspan", "stratify", "data.json", "--ci-method", "arcsine"]);
        assert!(result.is_err());
    }
}
