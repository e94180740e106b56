use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    client::ResourceClient,
    errors::ServiceError,
    models::{
        material_request::MATERIAL_REQUEST_DOCTYPE, MaterialCheckResult, MaterialRequestPayload,
        SubmittedDocument, SubmittedMaterialRequest,
    },
};

/// Turns shortages into a submitted purchase Material Request.
#[derive(Clone)]
pub struct MaterialRequestBuilder {
    client: Arc<dyn ResourceClient>,
}

impl MaterialRequestBuilder {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Payload scheduled for today (UTC).
    pub fn build(&self, results: &[MaterialCheckResult]) -> MaterialRequestPayload {
        self.build_on(results, Utc::now().date_naive())
    }

    /// One line per result with a non-zero request quantity. The payload may
    /// have no lines at all.
    pub fn build_on(
        &self,
        results: &[MaterialCheckResult],
        schedule_date: NaiveDate,
    ) -> MaterialRequestPayload {
        MaterialRequestPayload::from_results(results, schedule_date)
    }

    #[instrument(skip(self, payload), fields(lines = payload.items.len()))]
    pub async fn submit(
        &self,
        payload: &MaterialRequestPayload,
    ) -> Result<SubmittedMaterialRequest, ServiceError> {
        let body = serde_json::to_value(payload)?;
        let response = self
            .client
            .create_document(MATERIAL_REQUEST_DOCTYPE, &body)
            .await?;
        let submitted = SubmittedDocument::from_value(response.into_data_or_body())?;

        info!(
            "Submitted material request {} with {} lines",
            submitted.name.as_deref().unwrap_or("<unnamed>"),
            payload.items.len()
        );
        Ok(submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockResourceClient, ResourceResponse};
    use assert_matches::assert_matches;
    use mockall::predicate::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn results() -> Vec<MaterialCheckResult> {
        vec![
            MaterialCheckResult::evaluate("X", "W1", dec!(10), dec!(4)),
            MaterialCheckResult::evaluate("Y", "W2", dec!(5), dec!(5)),
        ]
    }

    #[test]
    fn build_keeps_only_shortages() {
        let builder = MaterialRequestBuilder::new(Arc::new(MockResourceClient::new()));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let payload = builder.build_on(&results(), date);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].item_code, "X");
        assert_eq!(payload.items[0].qty, dec!(6));
        assert_eq!(payload.schedule_date, date);
    }

    #[test]
    fn building_twice_gives_the_same_lines() {
        let builder = MaterialRequestBuilder::new(Arc::new(MockResourceClient::new()));
        let first = builder.build(&results());
        let second = builder.build(&results());
        assert_eq!(first.items, second.items);
    }

    #[tokio::test]
    async fn submit_posts_payload_and_returns_record() {
        let mut mock = MockResourceClient::new();
        mock.expect_create_document()
            .with(eq("Material Request"), always())
            .times(1)
            .returning(|_, body| {
                assert_eq!(body["material_request_type"], json!("Purchase"));
                assert_eq!(body["docstatus"], json!(0));
                Ok(ResourceResponse::from_value(json!({
                    "data": {"name": "MAT-MR-0001", "doctype": "Material Request", "docstatus": 0}
                })))
            });

        let builder = MaterialRequestBuilder::new(Arc::new(mock));
        let payload = builder.build(&results());
        let submitted = builder.submit(&payload).await.unwrap();

        assert_eq!(submitted.name.as_deref(), Some("MAT-MR-0001"));
        assert_eq!(submitted.docstatus, Some(0));
    }

    #[tokio::test]
    async fn submit_surfaces_transport_errors() {
        let mut mock = MockResourceClient::new();
        mock.expect_create_document()
            .returning(|_, _| Err(ServiceError::http_status(417, "ValidationError")));

        let builder = MaterialRequestBuilder::new(Arc::new(mock));
        let payload = builder.build(&results());
        assert_matches!(
            builder.submit(&payload).await,
            Err(ServiceError::TransportError { status: Some(417), .. })
        );
    }
}
