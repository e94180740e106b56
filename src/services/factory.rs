use std::sync::Arc;

use crate::{
    client::{ErpNextClient, ResourceClient},
    config::AppConfig,
    errors::ServiceError,
    models::WorkOrderCheck,
    nodes::{
        CreateMaterialRequestNode, CreateStockEntryNode, ItemErrorPolicy, ItemOutcome,
        MaterialCheckingNode, MaterialCheckingParams, MaterialRequestCreated, StockEntryCreated,
    },
    services::{
        availability::AvailabilityChecker, material_requests::MaterialRequestBuilder,
        stock::BinStockLookup, stock_entries::StockEntryBuilder, work_orders::WorkOrderFetcher,
    },
};

/// Factory for creating service instances over one shared ERPNext client
#[derive(Clone)]
pub struct ServiceFactory {
    client: Arc<dyn ResourceClient>,
    stock_lookup_concurrency: usize,
    item_error_policy: ItemErrorPolicy,
}

impl ServiceFactory {
    /// Creates a new service factory with the given dependencies
    pub fn new(client: Arc<dyn ResourceClient>, stock_lookup_concurrency: usize) -> Self {
        Self {
            client,
            stock_lookup_concurrency: stock_lookup_concurrency.max(1),
            item_error_policy: ItemErrorPolicy::default(),
        }
    }

    /// Builds the authenticated HTTP client described by `config`
    pub async fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let client = ErpNextClient::from_provider(config, config.request_timeout()).await?;
        Ok(Self::new(Arc::new(client), config.stock_lookup_concurrency)
            .with_item_error_policy(config.item_error_policy))
    }

    /// Policy handed to the batch runs of the containers built from this factory
    pub fn with_item_error_policy(mut self, policy: ItemErrorPolicy) -> Self {
        self.item_error_policy = policy;
        self
    }

    pub fn item_error_policy(&self) -> ItemErrorPolicy {
        self.item_error_policy
    }

    pub fn work_order_fetcher(&self) -> WorkOrderFetcher {
        WorkOrderFetcher::new(self.client.clone())
    }

    pub fn availability_checker(&self) -> AvailabilityChecker {
        AvailabilityChecker::new(Arc::new(BinStockLookup::new(self.client.clone())))
            .with_concurrency(self.stock_lookup_concurrency)
    }

    pub fn material_request_builder(&self) -> MaterialRequestBuilder {
        MaterialRequestBuilder::new(self.client.clone())
    }

    pub fn stock_entry_builder(&self) -> StockEntryBuilder {
        StockEntryBuilder::new(self.client.clone())
    }

    pub fn material_checking_node(&self) -> MaterialCheckingNode {
        MaterialCheckingNode::new(self.work_order_fetcher(), self.availability_checker())
    }

    pub fn create_material_request_node(&self) -> CreateMaterialRequestNode {
        CreateMaterialRequestNode::new(self.material_request_builder())
    }

    pub fn create_stock_entry_node(&self) -> CreateStockEntryNode {
        CreateStockEntryNode::new(self.stock_entry_builder())
    }
}

/// Container holding every component of the material flow
#[derive(Clone)]
pub struct AppServices {
    pub work_orders: Arc<WorkOrderFetcher>,
    pub availability: Arc<AvailabilityChecker>,
    pub material_requests: Arc<MaterialRequestBuilder>,
    pub stock_entries: Arc<StockEntryBuilder>,
    pub material_checking: Arc<MaterialCheckingNode>,
    pub create_material_request: Arc<CreateMaterialRequestNode>,
    pub create_stock_entry: Arc<CreateStockEntryNode>,
    /// Policy used by the `check_materials` and `create_*` batch runs
    pub item_error_policy: ItemErrorPolicy,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("item_error_policy", &self.item_error_policy)
            .finish_non_exhaustive()
    }
}

impl AppServices {
    /// Creates a new container with all services initialized
    pub fn new(factory: &ServiceFactory) -> Self {
        Self {
            work_orders: Arc::new(factory.work_order_fetcher()),
            availability: Arc::new(factory.availability_checker()),
            material_requests: Arc::new(factory.material_request_builder()),
            stock_entries: Arc::new(factory.stock_entry_builder()),
            material_checking: Arc::new(factory.material_checking_node()),
            create_material_request: Arc::new(factory.create_material_request_node()),
            create_stock_entry: Arc::new(factory.create_stock_entry_node()),
            item_error_policy: factory.item_error_policy(),
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let factory = ServiceFactory::from_config(config).await?;
        Ok(Self::new(&factory))
    }

    pub async fn check_materials(
        &self,
        items: &[MaterialCheckingParams],
    ) -> Result<Vec<ItemOutcome<WorkOrderCheck>>, ServiceError> {
        self.material_checking.run(items, self.item_error_policy).await
    }

    pub async fn create_material_requests(
        &self,
        checks: &[WorkOrderCheck],
    ) -> Result<Vec<ItemOutcome<MaterialRequestCreated>>, ServiceError> {
        self.create_material_request
            .run(checks, self.item_error_policy)
            .await
    }

    pub async fn create_stock_entries(
        &self,
        checks: &[WorkOrderCheck],
    ) -> Result<Vec<ItemOutcome<StockEntryCreated>>, ServiceError> {
        self.create_stock_entry.run(checks, self.item_error_policy).await
    }
}
