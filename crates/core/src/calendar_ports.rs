//! Calendar persistence port
//!
//! Interface the pipeline's consumers use to persist finished descriptors.
//! Infrastructure provides the concrete provider client.

use async_trait::async_trait;
use vetra_domain::{CreatedEvent, EventDescriptor, Result};

/// Port for writing events to the user's calendar.
#[async_trait]
pub trait CalendarWriter: Send + Sync {
    /// Insert a single event and return the provider's handle for it.
    async fn insert_event(&self, event: &EventDescriptor) -> Result<CreatedEvent>;
}
