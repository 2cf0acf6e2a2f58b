use crate::error::QuesthookError;

use super::types::ConfigFile;

/// Expand environment variable references in a string.
///
/// Supported syntaxes:
/// - `${VAR}` - replaced with env var value; error if unset
/// - `${VAR:-fallback}` - replaced with env var value, or fallback if unset or empty
/// - `$env:VAR` - same as `${VAR}`
pub fn expand_env_vars(input: &str) -> Result<String, QuesthookError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(body) = after.strip_prefix('{') {
            let close = body.find('}').ok_or_else(|| {
                env_error(&format!("Unclosed variable reference: ${{{body}"))
            })?;
            let expr = &body[..close];
            match expr.split_once(":-") {
                Some((name, fallback)) => match std::env::var(name) {
                    Ok(val) if !val.is_empty() => result.push_str(&val),
                    _ => result.push_str(fallback),
                },
                None => result.push_str(&lookup(expr)?),
            }
            rest = &body[close + 1..];
            continue;
        }

        if let Some(body) = after.strip_prefix("env:") {
            let end = body
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(body.len());
            if end == 0 {
                return Err(env_error("Empty variable name in $env: reference"));
            }
            result.push_str(&lookup(&body[..end])?);
            rest = &body[end..];
            continue;
        }

        // Not a recognized pattern, output the '$' literally
        result.push('$');
        rest = after;
    }

    result.push_str(rest);
    Ok(result)
}

/// Expand environment variables in every string field of a config file.
pub fn expand_config_file(file: &mut ConfigFile) -> Result<(), QuesthookError> {
    for field in [
        &mut file.service_url,
        &mut file.challenge_slug,
        &mut file.token_path,
        &mut file.deployments_dir,
        &mut file.network,
        &mut file.rpc_url,
    ]
    .into_iter()
    .flatten()
    {
        *field = expand_env_vars(field)?;
    }
    Ok(())
}

fn lookup(name: &str) -> Result<String, QuesthookError> {
    std::env::var(name)
        .map_err(|_| env_error(&format!("Environment variable '{name}' is not set")))
}

fn env_error(detail: &str) -> QuesthookError {
    QuesthookError::ConfigError {
        path: std::path::PathBuf::from("<env>"),
        detail: detail.to_string(),
    }
}
