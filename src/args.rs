use crate::deployments::DeployedContracts;
use crate::QuesthookError;

/// Parse `--contract` values into a name -> address map.
///
/// Accepts `Name=address` and `Name:address`. Surrounding quotes on the
/// address are stripped. A name given twice keeps the last value.
pub fn parse_contract_args(args: &[String]) -> Result<DeployedContracts, QuesthookError> {
    let mut contracts = DeployedContracts::new();
    for arg in args {
        let (name, address) = arg
            .split_once('=')
            .or_else(|| arg.split_once(':'))
            .ok_or_else(|| {
                QuesthookError::InvalidArgument(format!(
                    "Cannot parse contract '{arg}': expected 'Name=address'"
                ))
            })?;

        let name = name.trim();
        let address = strip_quotes(address.trim());
        if name.is_empty() || address.is_empty() {
            return Err(QuesthookError::InvalidArgument(format!(
                "Contract name and address must be non-empty in '{arg}'"
            )));
        }
        contracts.insert(name.to_string(), address.to_string());
    }
    Ok(contracts)
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
