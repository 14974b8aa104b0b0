use serde::{Deserialize, Serialize};

/// Default scratch buffer size for [`drain`](crate::drain).
pub const DEFAULT_DRAIN_BUFFER_SIZE: usize = 4096;

/// Tunables for bounded transfers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Scratch buffer size used when draining a stream.
    pub drain_buffer_size: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            drain_buffer_size: DEFAULT_DRAIN_BUFFER_SIZE,
        }
    }
}
