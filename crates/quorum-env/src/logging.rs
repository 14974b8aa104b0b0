use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use tracing_subscriber::filter::{Directive, EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

use crate::check_state;
use crate::config::{LogDirective, LoggingConfig};
use crate::error::{EnvError, EnvResult};

/// The reloadable filter layer produced by [`LogControl::layered`].
pub type FilterLayer = reload::Layer<EnvFilter, Registry>;

/// Build an [`EnvFilter`] from a logging configuration.
pub fn build_filter(config: &LoggingConfig) -> EnvResult<EnvFilter> {
    let default_level = parse_level(&config.default_level)?;
    let mut filter = EnvFilter::default().add_directive(default_level.into());
    for directive in &config.directives {
        filter = filter.add_directive(parse_directive(directive)?);
    }
    Ok(filter)
}

fn parse_level(level: &str) -> EnvResult<LevelFilter> {
    LevelFilter::from_str(level).map_err(|e| EnvError::InvalidDirective {
        directive: level.to_string(),
        reason: e.to_string(),
    })
}

fn parse_directive(directive: &LogDirective) -> EnvResult<Directive> {
    check_state!(
        !directive.target.is_empty(),
        "log directive for level {:?} has an empty target",
        directive.level
    )?;
    let level = parse_level(&directive.level)?;
    let text = format!("{}={}", directive.target, level);
    text.parse::<Directive>()
        .map_err(|e| EnvError::InvalidDirective {
            directive: text.clone(),
            reason: e.to_string(),
        })
}

/// Runtime control over log levels.
///
/// Holds the reload handle of the installed filter plus the configuration it
/// was built from, so single targets can be raised or lowered later.
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    config: Mutex<LoggingConfig>,
}

impl LogControl {
    /// Build a reloadable filter layer without installing it.
    pub fn layered(config: &LoggingConfig) -> EnvResult<(Self, FilterLayer)> {
        let (layer, handle) = reload::Layer::new(build_filter(config)?);
        let control = Self {
            handle,
            config: Mutex::new(config.clone()),
        };
        Ok((control, layer))
    }

    /// Install the global subscriber: reloadable filter plus `fmt` output.
    pub fn install(config: &LoggingConfig) -> EnvResult<Self> {
        let (control, layer) = Self::layered(config)?;
        tracing_subscriber::registry()
            .with(layer)
            .with(fmt::layer())
            .try_init()
            .map_err(|e| EnvError::LoggingInstalled(e.to_string()))?;
        Ok(control)
    }

    /// Set the level for `target`, replacing any earlier override for it.
    pub fn set_level(&self, target: &str, level: &str) -> EnvResult<()> {
        let mut config = self.config.lock().unwrap_or_else(PoisonError::into_inner);

        let mut candidate = config.clone();
        match candidate.directives.iter_mut().find(|d| d.target == target) {
            Some(existing) => existing.level = level.to_string(),
            None => candidate.directives.push(LogDirective::new(target, level)),
        }

        let filter = build_filter(&candidate)?;
        self.handle
            .reload(filter)
            .map_err(|e| EnvError::Reload(e.to_string()))?;
        *config = candidate;
        tracing::debug!(target_name = target, level, "log level changed");
        Ok(())
    }

    /// Set the level applied to targets without an override.
    pub fn set_default_level(&self, level: &str) -> EnvResult<()> {
        let mut config = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        candidate.default_level = level.to_string();
        let filter = build_filter(&candidate)?;
        self.handle
            .reload(filter)
            .map_err(|e| EnvError::Reload(e.to_string()))?;
        *config = candidate;
        Ok(())
    }

    /// The per-target overrides currently in effect.
    pub fn directives(&self) -> Vec<LogDirective> {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .directives
            .clone()
    }

    /// Render the active filter, e.g. `info,quorum_io=debug`.
    pub fn current_filter(&self) -> EnvResult<String> {
        self.handle
            .with_current(|filter| filter.to_string())
            .map_err(|e| EnvError::Reload(e.to_string()))
    }
}

impl std::fmt::Debug for LogControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogControl")
            .field("directives", &self.directives())
            .finish_non_exhaustive()
    }
}
