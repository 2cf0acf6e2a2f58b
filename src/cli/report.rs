use crate::args::parse_contract_args;
use crate::config::HookConfig;
use crate::deployments;
use crate::error::QuesthookError;
use crate::hook::DeployHook;

use super::output::print_report_success;

/// Run the report command: collect the deployment, then hand it to the hook.
///
/// Deployments are read before any authentication so a broken deploy
/// directory fails without opening a browser.
pub async fn run_report(
    config: &HookConfig,
    chain_id: Option<u64>,
    contracts: &[String],
    json: bool,
) -> Result<(), QuesthookError> {
    let extra = parse_contract_args(contracts)?;
    let deployment = deployments::gather(config, chain_id, extra).await?;

    let hook = DeployHook::from_config(config, json)?;
    hook.run(&deployment).await?;

    tracing::info!(
        "Reported {} contract(s) for challenge '{}'",
        deployment.contracts.len(),
        config.challenge_slug
    );
    print_report_success(&deployment, json);
    Ok(())
}
