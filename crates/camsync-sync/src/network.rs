//! Device network detection
//!
//! The camera adapter broadcasts its own Wi-Fi network. [`ConnectivityOracle`]
//! decides from the current SSID whether a sync attempt makes sense;
//! [`SystemNetworkMonitor`] reads that SSID from the operating system.

use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::Context;
use camsync_core::config::NetworkConfig;
use camsync_core::ports::INetworkMonitor;
use tokio::process::Command;
use tracing::{debug, warn};

/// Wireless interface queried on macOS when none is configured
const DEFAULT_MAC_INTERFACE: &str = "en0";

// ============================================================================
// ConnectivityOracle
// ============================================================================

/// Reports whether the machine is on the adapter's network
pub struct ConnectivityOracle {
    monitor: Arc<dyn INetworkMonitor>,
    ssid_pattern: String,
    required: bool,
}

impl ConnectivityOracle {
    /// # Arguments
    /// * `monitor` - Source of the current SSID
    /// * `ssid_pattern` - Substring the adapter's SSID contains
    /// * `required` - When false the oracle always reports reachable
    pub fn new(
        monitor: Arc<dyn INetworkMonitor>,
        ssid_pattern: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            monitor,
            ssid_pattern: ssid_pattern.into(),
            required,
        }
    }

    pub fn from_config(monitor: Arc<dyn INetworkMonitor>, config: &NetworkConfig) -> Self {
        Self::new(
            monitor,
            config.ssid_pattern.clone(),
            config.require_device_network,
        )
    }

    /// True iff `ssid` looks like the adapter's network
    pub fn matches(&self, ssid: &str) -> bool {
        ssid.contains(&self.ssid_pattern)
    }

    /// Checks the current wireless association
    ///
    /// Monitor failures are logged and reported as unreachable.
    pub async fn is_device_network_reachable(&self) -> bool {
        if !self.required {
            return true;
        }
        match self.monitor.current_network_name().await {
            Ok(Some(ssid)) => {
                let on_device = self.matches(&ssid);
                debug!(%ssid, on_device, "Checked wireless network");
                on_device
            }
            Ok(None) => {
                debug!("Not associated with any wireless network");
                false
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Could not determine wireless network");
                false
            }
        }
    }

    /// Human-readable cause of a failed crawl
    pub async fn explain_crawl_failure(&self) -> &'static str {
        if self.is_device_network_reachable().await {
            "Issue reading files - is the adapter properly connected to the camera?"
        } else {
            "Not connected to device network"
        }
    }
}

// ============================================================================
// SystemNetworkMonitor
// ============================================================================

/// Reads the current SSID using the platform's command-line tools
///
/// Linux tries `iwgetid`, then `nmcli`. macOS uses `networksetup`. A missing
/// tool counts as "not associated".
#[derive(Debug, Clone, Default)]
pub struct SystemNetworkMonitor {
    interface: Option<String>,
}

impl SystemNetworkMonitor {
    pub fn new(interface: Option<String>) -> Self {
        Self { interface }
    }

    async fn linux_ssid(&self) -> anyhow::Result<Option<String>> {
        let mut args: Vec<&str> = Vec::new();
        if let Some(iface) = self.interface.as_deref() {
            args.push(iface);
        }
        args.push("-r");
        if let Some(ssid) = run_tool("iwgetid", &args).await?.as_deref().and_then(parse_iwgetid) {
            return Ok(Some(ssid));
        }

        let out = run_tool("nmcli", &["-t", "-f", "active,ssid", "dev", "wifi"]).await?;
        Ok(out.as_deref().and_then(parse_nmcli))
    }

    async fn macos_ssid(&self) -> anyhow::Result<Option<String>> {
        let iface = self.interface.as_deref().unwrap_or(DEFAULT_MAC_INTERFACE);
        let out = run_tool("networksetup", &["-getairportnetwork", iface]).await?;
        Ok(out.as_deref().and_then(parse_networksetup))
    }
}

#[async_trait::async_trait]
impl INetworkMonitor for SystemNetworkMonitor {
    async fn current_network_name(&self) -> anyhow::Result<Option<String>> {
        if cfg!(target_os = "macos") {
            self.macos_ssid().await
        } else {
            self.linux_ssid().await
        }
    }
}

/// Runs `program` and returns its stdout
///
/// `Ok(None)` if the program is not installed or exits unsuccessfully
/// (`iwgetid` exits non-zero when not associated).
async fn run_tool(program: &str, args: &[&str]) -> anyhow::Result<Option<String>> {
    let output = match Command::new(program).args(args).output().await {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(program, "Tool not installed");
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to run {program}")),
    };
    if !output.status.success() {
        debug!(program, status = ?output.status.code(), "Tool reported no network");
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
}

/// `iwgetid -r` prints the bare SSID
pub fn parse_iwgetid(out: &str) -> Option<String> {
    let ssid = out.trim();
    (!ssid.is_empty()).then(|| ssid.to_string())
}

/// `nmcli -t -f active,ssid dev wifi` prints `yes:<ssid>` for the active
/// network, escaping `:` and `\` in the SSID with a backslash.
pub fn parse_nmcli(out: &str) -> Option<String> {
    out.lines()
        .filter_map(|line| line.strip_prefix("yes:"))
        .map(unescape_nmcli)
        .find(|ssid| !ssid.is_empty())
}

fn unescape_nmcli(field: &str) -> String {
    let mut ssid = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                ssid.push(escaped);
            }
        } else {
            ssid.push(c);
        }
    }
    ssid
}

/// `networksetup -getairportnetwork en0` prints
/// `Current Wi-Fi Network: <ssid>` or a "not associated" sentence.
pub fn parse_networksetup(out: &str) -> Option<String> {
    let line = out.lines().next()?;
    let (_, ssid) = line.split_once("Network: ")?;
    let ssid = ssid.trim();
    (!ssid.is_empty()).then(|| ssid.to_string())
}
