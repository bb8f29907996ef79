//! Configuration loading helpers for the client.
//!
//! Configuration flags are peeled off the front of the argument list and
//! handed to `ortho_config`; whatever follows is parsed by the client's own
//! `clap` definition.

use std::ffi::{OsStr, OsString};

use adbt_config::Config;
use ortho_config::OrthoConfig;

use crate::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`adbt_config::Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--device-endpoint",
    "--receive-mode",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration for the client.
    ///
    /// Only the leading configuration flags reach the loader; a configuration
    /// flag placed after `--mode` is rejected by the client's own parser.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

fn classify_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Skip;
    }
    let (flag, has_inline_value) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (text.as_ref(), false),
    };
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Skip
    }
}

#[derive(Debug)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) cli_arguments: Vec<OsString>,
}

/// Splits `args` (including the program name) into the leading
/// configuration flags and the remainder. Both halves keep the program name.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            cli_arguments: Vec::new(),
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut consumed = 0;
    let mut pending_value = false;
    for argument in rest {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
        } else {
            match classify_flag(argument) {
                FlagAction::Include { needs_value } => {
                    config_arguments.push(argument.clone());
                    pending_value = needs_value;
                }
                FlagAction::Skip => break,
            }
        }
        consumed += 1;
    }

    let mut cli_arguments = vec![program.clone()];
    cli_arguments.extend(rest[consumed..].iter().cloned());
    ConfigArgumentSplit {
        config_arguments,
        cli_arguments,
    }
}
