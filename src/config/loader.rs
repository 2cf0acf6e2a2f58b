use std::path::{Path, PathBuf};

use crate::error::QuesthookError;

use super::env::expand_config_file;
use super::types::{ConfigFile, HookConfig};

pub const CONFIG_ENV_VAR: &str = "QUESTHOOK_CONFIG";

/// Strip JSONC comments (`//` line comments and `/* */` block comments).
/// Newlines inside comments are kept so serde error positions stay accurate.
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if in_string {
            result.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                result.push(ch);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Discover config files in precedence order (highest first).
///
/// 1. `--config` CLI flag
/// 2. `QUESTHOOK_CONFIG` env var
/// 3. `./config/questhook.json` (project-level)
/// 4. `~/.questhook/questhook.json` or `~/.questhook/questhook.jsonc`
///
/// An explicit path (1 or 2) that does not exist is an error; the implicit
/// locations are simply skipped.
pub fn discover_config_files(cli_config: Option<&str>) -> Result<Vec<PathBuf>, QuesthookError> {
    let mut files = Vec::new();

    let explicit = cli_config
        .map(PathBuf::from)
        .into_iter()
        .chain(std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));
    for path in explicit {
        if !path.exists() {
            return Err(QuesthookError::ConfigError {
                path,
                detail: "File not found".into(),
            });
        }
        if !files.contains(&path) {
            files.push(path);
        }
    }

    let project = PathBuf::from("./config/questhook.json");
    if project.exists() && !files.contains(&project) {
        files.push(project);
    }

    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".questhook");
        let json = dir.join("questhook.json");
        let jsonc = dir.join("questhook.jsonc");
        if json.exists() && !files.contains(&json) {
            files.push(json);
        } else if jsonc.exists() && !files.contains(&jsonc) {
            files.push(jsonc);
        }
    }

    Ok(files)
}

/// Load a single config file, stripping JSONC comments before parsing.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, QuesthookError> {
    let content = std::fs::read_to_string(path).map_err(|e| QuesthookError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    let stripped = strip_jsonc_comments(&content);
    serde_json::from_str::<ConfigFile>(&stripped).map_err(|e| QuesthookError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Invalid JSON: {e}"),
    })
}

/// Load, expand, and merge all configuration.
///
/// `overrides` carries values given on the command line; they beat every file
/// and are taken literally. Variable references are expanded per file.
pub fn load_config(
    cli_config: Option<&str>,
    overrides: ConfigFile,
) -> Result<HookConfig, QuesthookError> {
    let mut merged = overrides;

    for path in discover_config_files(cli_config)? {
        tracing::debug!("Loading config from {}", path.display());
        let mut file = load_config_file(&path)?;
        expand_config_file(&mut file)?;
        merged.merge(file);
    }

    Ok(merged.resolve())
}
