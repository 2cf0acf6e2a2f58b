use std::io::IsTerminal;

use colored::Colorize;

use crate::deployments::Deployment;
use crate::error::QuesthookError;

fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

const AUTH_PROMPT: &str = "We need you to sign a transaction to authenticate. \
     If the following page doesn't open, please open it manually:";

/// Tell the operator a browser step is needed and show the URL to open.
/// In JSON mode this goes to stderr so stdout stays parseable.
pub fn print_auth_prompt(url: &str, json_mode: bool) {
    if json_mode {
        eprintln!("{AUTH_PROMPT}");
        eprintln!("{url}");
    } else if stdout_is_tty() {
        println!("{AUTH_PROMPT}");
        println!("{}", url.underline());
    } else {
        println!("{AUTH_PROMPT}");
        println!("{url}");
    }
}

pub fn print_report_success(deployment: &Deployment, json_mode: bool) {
    if json_mode {
        let json = serde_json::json!({
            "ok": true,
            "chainId": deployment.chain_id,
            "deployedContracts": deployment.contracts,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return;
    }

    let tty = stdout_is_tty();
    let label = if tty {
        "Server updated".green().bold().to_string()
    } else {
        "Server updated".to_string()
    };
    println!("{label}");
    for line in contract_lines(deployment) {
        if tty {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }
}

pub fn print_error(err: &QuesthookError, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
    } else if std::io::stderr().is_terminal() {
        eprintln!("{}: {err}", "Error".red().bold());
    } else {
        eprintln!("Error: {err}");
    }
}

fn contract_lines(deployment: &Deployment) -> Vec<String> {
    let width = deployment
        .contracts
        .keys()
        .map(|name| name.len())
        .max()
        .unwrap_or(0);
    deployment
        .contracts
        .iter()
        .map(|(name, address)| format!("  {name:<width$}  {address}  (chain {})", deployment.chain_id))
        .collect()
}
