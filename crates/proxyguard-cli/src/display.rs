//! Display utilities for CLI output formatting

use colored::Colorize;

use proxyguard_client::{FactoryError, ProviderClient, Route};
use proxyguard_common::{DirectConnectionFlag, TransportPolicy};

/// Display the policy resolved from the inputs
pub fn display_policy(policy: &TransportPolicy) {
    let flag = match policy.flag {
        DirectConnectionFlag::Reject => "reject".red().bold(),
        DirectConnectionFlag::Unknown => "unknown (treated as allow)".yellow(),
        _ => "allow".green(),
    };
    println!("{} {flag}", "direct connections:".bold());
    println!(
        "{} {}",
        "proxy address:".bold(),
        policy.proxy_address().unwrap_or("<none>")
    );
}

/// Display a successfully built client
pub fn display_client(client: &ProviderClient) {
    let route = match client.route() {
        Route::Socks5(address) => format!("socks5 via {address}").cyan(),
        Route::Direct => "direct".yellow(),
    };
    let options = client.options();
    println!(
        "{} client for '{}' built: {route}",
        "✓".green().bold(),
        client.identity()
    );
    println!(
        "  pool={} idle={}s setup={}s request={}s",
        options.max_idle_connections,
        options.idle_timeout_secs,
        options.tls_handshake_timeout_secs,
        options.request_timeout_secs
    );
}

/// Display a construction failure
pub fn display_error(err: &FactoryError) {
    let label = if err.is_policy_violation() {
        "policy violation"
    } else {
        "construction failed"
    };
    eprintln!("{} {}: {err}", "✗".red().bold(), label.red());
}
