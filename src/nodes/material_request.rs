use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{run_batch, CreatedRecord, ItemErrorPolicy, ItemOutcome};
use crate::{
    errors::ServiceError,
    models::{AvailabilityStatus, WorkOrderCheck},
    services::material_requests::MaterialRequestBuilder,
};

pub const SKIPPED_AVAILABLE: &str = "Skipped because status is available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequestCreated {
    pub material_request: CreatedRecord,
}

/// Raises a purchase request for every work order that is short of material.
#[derive(Clone)]
pub struct CreateMaterialRequestNode {
    builder: MaterialRequestBuilder,
}

impl CreateMaterialRequestNode {
    pub fn new(builder: MaterialRequestBuilder) -> Self {
        Self { builder }
    }

    pub async fn run(
        &self,
        items: &[WorkOrderCheck],
        policy: ItemErrorPolicy,
    ) -> Result<Vec<ItemOutcome<MaterialRequestCreated>>, ServiceError> {
        run_batch(items, policy, |_, check| self.create(check)).await
    }

    #[instrument(skip(self, check), fields(work_order = ?check.work_order))]
    async fn create(
        &self,
        check: &WorkOrderCheck,
    ) -> Result<ItemOutcome<MaterialRequestCreated>, ServiceError> {
        if check.status.map_or(true, AvailabilityStatus::is_available) {
            info!("{}", SKIPPED_AVAILABLE);
            return Ok(ItemOutcome::skipped(SKIPPED_AVAILABLE));
        }

        let payload = self.builder.build(&check.material_check_result);
        let material_request = self.builder.submit(&payload).await?;
        Ok(ItemOutcome::Completed(MaterialRequestCreated {
            material_request: CreatedRecord::new(material_request),
        }))
    }
}
