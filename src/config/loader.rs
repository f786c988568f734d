//! Configuration loading with layered precedence.
//!
//! This module loads configuration with the precedence order (lowest to
//! highest): application defaults, settings file, environment variables,
//! command-line arguments.
//!
//! Layers are composed manually with `MergeComposer` rather than through the
//! derived `load()`, because the `Cli` struct owns argument parsing (including
//! `--config`), and because the settings file may be TOML, YAML or JSON.
//!
//! Environment variables are read through [`mockable::Env`] so the
//! environment layer can be exercised without touching process state.

use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::File;
use mockable::{DefaultEnv, Env};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `LOADENV_DOTENV`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["compose", "program"]`).
    path: &'static [&'static str],
}

/// Table of all environment variables and their JSON paths.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "LOADENV_DOTENV",
        path: &["dotenv"],
    },
    EnvVarSpec {
        env_var: "LOADENV_COMPOSE_PROGRAM",
        path: &["compose", "program"],
    },
];

/// Settings file names tried during discovery, as `(dotfile, xdg file)` pairs.
const DISCOVERY_NAMES: &[(&str, &str)] = &[
    (".loadenv.toml", "config.toml"),
    (".loadenv.yaml", "config.yaml"),
    (".loadenv.yml", "config.yml"),
    (".loadenv.json", "config.json"),
];

/// Supported settings file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    /// Picks a format from the extension, defaulting to TOML.
    fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("yaml" | "yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    fn parse(self, content: &str) -> std::result::Result<Value, String> {
        match self {
            Self::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        }
    }
}

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to stay in sync with the loader's actual mappings.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Read a settings file and push it to the composer.
///
/// The file is opened by its full path with ambient authority, so a
/// symlinked dotfile resolves to its target.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let content = read_settings(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ParseError {
                message: format!("failed to read {path}: {e}"),
            }
        }
    })?;

    let value = FileFormat::from_path(path)
        .parse(&content)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.to_path_buf()));
    Ok(())
}

fn read_settings(path: &Utf8Path) -> io::Result<String> {
    let mut content = String::new();
    File::open_ambient(path, ambient_authority())?.read_to_string(&mut content)?;
    Ok(content)
}

/// Environment variable naming a settings file to try before discovery.
const CONFIG_PATH_ENV_VAR: &str = "LOADENV_CONFIG_PATH";

/// Find the settings file to use.
///
/// An explicit `--config` path is the only candidate when given; if it does
/// not exist no settings file is read. Otherwise `LOADENV_CONFIG_PATH` is
/// tried, then the discovery locations in [`discovery_candidates`] order.
fn resolve_config_path<E: Env>(cli: &Cli, env: &E) -> Option<Utf8PathBuf> {
    if let Some(explicit) = cli.config.as_ref() {
        if explicit.is_file() {
            return Some(explicit.clone());
        }
        warn!(
            path = %explicit,
            "configuration file does not exist; no settings file will be read"
        );
        return None;
    }

    if let Some(from_env) = env
        .string(CONFIG_PATH_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(Utf8PathBuf::from)
    {
        if from_env.is_file() {
            return Some(from_env);
        }
        debug!(
            path = %from_env,
            var = CONFIG_PATH_ENV_VAR,
            "settings path from environment does not name a file"
        );
    }

    discovery_candidates()
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Settings file locations, most preferred first.
///
/// The working directory comes first, followed by the XDG and home
/// locations `ConfigDiscovery` reports. Every supported format is tried in a
/// directory before the next directory is considered.
fn discovery_candidates() -> Vec<Utf8PathBuf> {
    let per_format: Vec<Vec<Utf8PathBuf>> = DISCOVERY_NAMES
        .iter()
        .map(|&(dotfile, config_file)| {
            ConfigDiscovery::builder("loadenv")
                .config_file_name(config_file)
                .dotfile_name(dotfile)
                .build()
                .utf8_candidates()
        })
        .collect();
    let working_dir = std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::try_from(dir).ok());

    order_by_directory(working_dir.as_deref(), &per_format)
}

/// Regroup per-format candidate lists by directory.
///
/// Directories are visited in `first`, then first-seen, order. Within a
/// directory, candidates keep the order of `per_format`.
fn order_by_directory(
    first: Option<&Utf8Path>,
    per_format: &[Vec<Utf8PathBuf>],
) -> Vec<Utf8PathBuf> {
    let mut dirs: Vec<&Utf8Path> = first.into_iter().collect();
    for candidate in per_format.iter().flatten() {
        let dir = parent_of(candidate);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }

    let mut ordered: Vec<Utf8PathBuf> = Vec::new();
    for dir in dirs {
        for candidate in per_format.iter().flatten() {
            if parent_of(candidate) == dir && !ordered.contains(candidate) {
                ordered.push(candidate.clone());
            }
        }
    }
    ordered
}

fn parent_of(path: &Utf8Path) -> &Utf8Path {
    path.parent().unwrap_or_else(|| Utf8Path::new(""))
}

/// Load configuration with full layer precedence from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if the settings file cannot be read or parsed, or if
/// the merged layers do not form a valid configuration.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &DefaultEnv::new())
}

/// Load configuration with full layer precedence.
///
/// This function loads configuration from all available sources:
/// 1. Application defaults defined in the struct
/// 2. Settings file (from `--config` or discovery)
/// 3. Environment variables prefixed with `LOADENV_`, read from `env`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// Later sources override earlier ones.
///
/// # Errors
///
/// Returns `ConfigError` if the settings file cannot be read or parsed, or if
/// the merged layers do not form a valid configuration.
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults (serialised from AppConfig::default()).
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Settings file.
    if let Some(path) = resolve_config_path(cli, env) {
        info!(path = %path, "Using config file");
        load_config_file(&path, &mut composer)?;
    }

    // Layer 3: Environment variables.
    let env_values = collect_env_vars(env);
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let mut config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.normalise();
    debug!(?config, "configuration loaded");

    Ok(config)
}

/// Collect `LOADENV_*` environment variables into a JSON value.
///
/// Every mapped value is a string, so no typed parsing is needed.
fn collect_env_vars<E: Env>(env: &E) -> Value {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        insert_at_path(&mut root, spec.path, Value::String(raw_value));
    }

    if root.is_empty() {
        Value::Null
    } else {
        Value::Object(root)
    }
}

/// Insert a value at a nested path in a JSON map.
///
/// For a path like `["compose", "program"]`, this creates the intermediate
/// `compose` object if needed and inserts `program` within it.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref dotenv) = cli.dotenv {
        overrides.insert(
            String::from("dotenv"),
            Value::String(dotenv.as_str().to_owned()),
        );
    }

    if let Some(ref program) = cli.compose_program {
        insert_at_path(
            &mut overrides,
            &["compose", "program"],
            Value::String(program.clone()),
        );
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
