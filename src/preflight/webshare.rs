//! Webshare preflight check.

use super::CheckResult;
use crate::models::config::WebshareConfig;
use crate::services::webshare::WebshareClient;

/// Check that the Webshare API answers and accepts the token.
pub async fn check(config: &WebshareConfig) -> CheckResult {
    let client = match WebshareClient::new(config) {
        Ok(client) => client,
        Err(_) => {
            return CheckResult::fail(
                "Webshare",
                "token not configured",
                "Set WEBSHARE_TOKEN or webshare.token in config.toml",
            )
        }
    };

    match client.verify_token().await {
        Ok(true) => CheckResult::ok("Webshare", "token accepted"),
        Ok(false) => CheckResult::fail(
            "Webshare",
            "token rejected",
            "Log in to Webshare again and update the token",
        ),
        Err(e) => CheckResult::fail(
            "Webshare",
            &format!("connection failed ({})", e),
            "Check your network connection and webshare.api_url",
        ),
    }
}
