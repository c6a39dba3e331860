use anyhow::Result;
use serde::Serialize;

use crate::azure::az::TOKEN_ENV;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub async fn run() -> Result<()> {
    let mut checks = Vec::new();

    checks.push(Check {
        name: "terraform".to_string(),
        ok: which_ok("terraform"),
        detail: "required for state pull, state rm and import".to_string(),
    });

    // az is only needed when no token is provided through the environment.
    let token_set = std::env::var_os(TOKEN_ENV).is_some();
    checks.push(Check {
        name: "az".to_string(),
        ok: which_ok("az") || token_set,
        detail: format!("required for Azure access tokens unless {TOKEN_ENV} is set, and for --delete-before-move"),
    });

    checks.push(Check {
        name: "ARM_SUBSCRIPTION_ID".to_string(),
        ok: std::env::var_os("ARM_SUBSCRIPTION_ID").is_some(),
        detail: "optional (default for --subscription-id)".to_string(),
    });

    let ok = checks.iter().all(|c| c.ok || c.name == "ARM_SUBSCRIPTION_ID");
    let out = DoctorOut { ok, checks };
    if output::is_json() {
        output::print(&out)?;
    } else {
        for c in &out.checks {
            let mark = if c.ok { "ok" } else { "missing" };
            output::bullet(&format!("{}: {mark} ({})", c.name, c.detail));
        }
    }
    Ok(())
}

fn which_ok(cmd: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        if dir.join(cmd).is_file() {
            return true;
        }
        cfg!(windows) && dir.join(format!("{cmd}.exe")).is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_binary_is_missing() {
        assert!(!which_ok("tfshift-definitely-not-installed"));
    }
}
