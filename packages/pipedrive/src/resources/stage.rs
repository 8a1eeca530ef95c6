use pipedrive_core::ResourceKind;

use super::{related, wrap_all, Deal, Pipeline};
use crate::client::Client;
use crate::Error;

resource! {
    /// A pipeline stage. Served by the V2 API.
    Stage => Stage
}

impl Stage {
    pub fn pipeline(&self) -> Option<Pipeline> {
        related(self, "pipeline")
    }

    /// Deals in the stage with the given id, across all owners.
    pub fn deals(client: &Client, stage_id: i64) -> Result<Vec<Deal>, Error> {
        Ok(wrap_all(client.list_nested(
            ResourceKind::Stage,
            stage_id,
            "deals",
            ResourceKind::Deal,
            &[("everyone", "1")],
        )?))
    }
}
