use anyhow::anyhow;
use reqwest::Client;
use rescan_api::trigger_route;
use serde_json::json;
use url::Url;

use crate::cli::{PingArgs, require_route_segment};
use crate::client::{CliError, CliResult, classify_failure};

pub(crate) async fn handle_ping(client: &Client, args: &PingArgs, request_id: &str) -> CliResult<()> {
    let message = ping(client, args).await?;
    println!("{message} (request {request_id})");
    Ok(())
}

pub(crate) async fn ping(client: &Client, args: &PingArgs) -> CliResult<String> {
    require_route_segment(&args.trigger)?;
    let route = trigger_route(&args.trigger);
    let url = trigger_url(&args.url, &route)?;

    let response = client
        .post(url)
        .json(&json!({ "eventType": "Test" }))
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to {route} failed: {err}")))?;

    if response.status().is_success() {
        Ok(format!(
            "trigger '{}' acknowledged test event ({})",
            args.trigger,
            response.status()
        ))
    } else {
        Err(classify_failure(response).await)
    }
}

/// Resolve `route` beneath `base`, keeping any path prefix the server is
/// mounted under (`http://host/rescan` and `http://host/rescan/` agree).
fn trigger_url(base: &Url, route: &str) -> CliResult<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefix = format!("{}/", base.path());
        base.set_path(&prefix);
    }
    base.join(route.trim_start_matches('/'))
        .map_err(|err| CliError::failure(anyhow!("invalid server URL: {err}")))
}
