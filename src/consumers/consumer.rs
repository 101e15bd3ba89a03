//! # Core consumer trait
//!
//! `Consumer` is the extension point through which delivered messages reach
//! the outside world. One consumer is bound per module at `start` time.
//!
//! ## Contract
//! - `handle` runs on the module's own output worker; a slow consumer stalls
//!   further reads for **its** module only, never for other modules or for
//!   the supervisor's control operations.
//! - Delivery order equals line-arrival order on the module's child stdout.
//! - Consumers bound to a single-threaded presentation context must marshal
//!   messages onto that context themselves; the runtime does not.

use std::sync::Arc;

use async_trait::async_trait;

use crate::messages::Message;

/// Shared handle to a consumer (`Arc<dyn Consumer>`).
pub type ConsumerRef = Arc<dyn Consumer>;

/// Contract for message consumers.
///
/// Called from the owning module's worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Consumer: Send + Sync + 'static {
    /// Handles a single delivered message.
    ///
    /// # Parameters
    /// - `message`: Reference to the message (does not transfer ownership)
    async fn handle(&self, message: &Message);

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
