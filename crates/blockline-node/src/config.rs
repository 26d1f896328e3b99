//! Configuration loading.

use std::path::Path;

use blockline_core::{IncomingEvent, NodeConfig};
use blockline_harness::standard_configs;

use crate::NodeError;

/// Read and validate one node configuration.
pub fn load_config(path: &Path) -> Result<NodeConfig, NodeError> {
    let text = std::fs::read_to_string(path)?;
    NodeConfig::from_toml(&text)
        .map_err(|source| NodeError::Config { path: path.to_path_buf(), source })
}

/// Configurations for the local and far instruments.
///
/// Missing files fall back to the standard cross-taught pair. A far end
/// derived for a given local file is taught that node's events and keeps its
/// own lever.
pub fn pair_configs(
    local: Option<&Path>,
    peer: Option<&Path>,
) -> Result<[NodeConfig; 2], NodeError> {
    let [default_local, default_peer] = standard_configs();

    let derived = local.is_some();
    let local = match local {
        Some(path) => load_config(path)?,
        None => default_local,
    };
    let peer = match peer {
        Some(path) => load_config(path)?,
        None if derived => derive_peer(&local, default_peer),
        None => default_peer,
    };

    if !local.events.iter().any(|e| e.node_number == peer.node_number) {
        tracing::warn!(
            local = local.node_number,
            peer = peer.node_number,
            "local node has not been taught any of the peer's events"
        );
    }
    Ok([local, peer])
}

fn derive_peer(local: &NodeConfig, mut peer: NodeConfig) -> NodeConfig {
    let lever = IncomingEvent::CommutatorLock.variable();
    peer.events.retain(|e| e.variable == lever);
    let levers = std::mem::take(&mut peer.events);
    peer.teach_peer(local.node_number);
    peer.events.extend(levers);
    peer
}
