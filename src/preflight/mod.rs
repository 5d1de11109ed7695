//! Preflight checks module.

mod tmdb;
mod webshare;

use crate::models::config::Config;
use crate::Result;
use colored::Colorize;

/// Result of a preflight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

/// External services a command depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Webshare,
    Tmdb,
}

/// Run the checks for the given services.
pub async fn run_preflight_checks(config: &Config, services: &[Service]) -> Result<Vec<CheckResult>> {
    let mut results = Vec::new();

    for service in services {
        let result = match service {
            Service::Webshare => webshare::check(&config.webshare).await,
            Service::Tmdb => tmdb::check(&config.tmdb).await,
        };
        results.push(result);
    }

    Ok(results)
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        if result.success {
            println!(
                "{} {}: {}",
                "[OK]".green(),
                result.name.bold(),
                result.message
            );
        } else {
            println!(
                "{} {}: {}",
                "[FAIL]".red(),
                result.name.bold(),
                result.message
            );
            if let Some(ref hint) = result.hint {
                println!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.success)
}
