//! Network monitor port (driven/secondary port)
//!
//! Reports which wireless network the machine is currently associated
//! with. The sync loop only uses this as an advisory gate: the camera
//! adapter runs its own ad-hoc network, so a sync attempt is pointless
//! unless we are on it.

/// Port trait for querying the current wireless association
#[async_trait::async_trait]
pub trait INetworkMonitor: Send + Sync {
    /// Returns the SSID of the currently associated wireless network
    ///
    /// `Ok(None)` means the machine is not associated with any wireless
    /// network (or the platform offers no way to tell).
    async fn current_network_name(&self) -> anyhow::Result<Option<String>>;
}
