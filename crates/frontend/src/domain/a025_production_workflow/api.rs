use async_trait::async_trait;
use contracts::domain::a025_production_workflow::request::{
    AssignResponsibleToProductionsBody, DeleteManyProductionsBody,
    GetProductionWorkflowsFilteredRequest, ProductionWorkflowMultiLaunchItem,
    ProductionWorkflowUpdateBody, SetChosenFiltersBody, UpdateOrderPriorityBody,
};
use contracts::domain::a025_production_workflow::response::{
    ProductionIssuesSummary, ProductionWorkflowListResponse,
};
use contracts::shared::common::{IdName, MinMax, PaginatedResponse};
use contracts::system::users::User;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::api_utils::{auth_header, join_url, query_string};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Failed to send request: {0}")]
    Network(String),
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to serialize request: {0}")]
    Serialize(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Backend endpoints used by the production page
#[async_trait(?Send)]
pub trait ProductionApi: Send + Sync {
    async fn get_all(
        &self,
        body: &GetProductionWorkflowsFilteredRequest,
    ) -> Result<ProductionWorkflowListResponse, ApiError>;

    async fn get_issues(
        &self,
        body: &GetProductionWorkflowsFilteredRequest,
    ) -> Result<ProductionIssuesSummary, ApiError>;

    /// Productions currently being launched across the tenant
    async fn get_launching_count(&self) -> Result<u64, ApiError>;

    async fn update(&self, id: &str, body: &ProductionWorkflowUpdateBody) -> Result<(), ApiError>;

    async fn update_order_priority(
        &self,
        order_id: &str,
        body: &UpdateOrderPriorityBody,
    ) -> Result<(), ApiError>;

    async fn assign_responsible(
        &self,
        body: &AssignResponsibleToProductionsBody,
    ) -> Result<(), ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    async fn delete_many(&self, body: &DeleteManyProductionsBody) -> Result<(), ApiError>;

    async fn launch_bulk(&self, items: &[ProductionWorkflowMultiLaunchItem]) -> Result<(), ApiError>;

    async fn set_chosen_filters(&self, body: &SetChosenFiltersBody) -> Result<(), ApiError>;

    async fn get_estimation_info(&self) -> Result<MinMax, ApiError>;

    async fn get_product_types(&self, skip: u64, take: u64) -> Result<Vec<IdName>, ApiError>;

    /// Saved filters of the current user, `None` if nothing was saved yet
    async fn get_user_production_filters(
        &self,
    ) -> Result<Option<GetProductionWorkflowsFilteredRequest>, ApiError>;

    async fn get_users(&self, skip: u64, take: u64) -> Result<Vec<User>, ApiError>;

    async fn get_current_user(&self) -> Result<User, ApiError>;
}

/// `ProductionApi` over HTTP (gloo-net)
#[derive(Debug, Clone)]
pub struct HttpProductionApi {
    base_url: String,
}

impl HttpProductionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let header = auth_header().ok_or(ApiError::NotAuthenticated)?;
        Ok(builder.header("Authorization", &header))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorized(builder)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn send_json<B: Serialize>(
        &self,
        builder: RequestBuilder,
        body: &B,
    ) -> Result<Response, ApiError> {
        let response = self
            .authorized(builder)?
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    log::error!("request to {} failed: {} {}", response.url(), status, message);
    Err(ApiError::Status { status, message })
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait(?Send)]
impl ProductionApi for HttpProductionApi {
    async fn get_all(
        &self,
        body: &GetProductionWorkflowsFilteredRequest,
    ) -> Result<ProductionWorkflowListResponse, ApiError> {
        let response = self
            .send_json(Request::post(&self.url("/production-workflows/all")), body)
            .await?;
        parse(response).await
    }

    async fn get_issues(
        &self,
        body: &GetProductionWorkflowsFilteredRequest,
    ) -> Result<ProductionIssuesSummary, ApiError> {
        let response = self
            .send_json(Request::post(&self.url("/production-workflows/get-issues")), body)
            .await?;
        parse(response).await
    }

    async fn get_launching_count(&self) -> Result<u64, ApiError> {
        let path = format!(
            "/production-workflows/count{}",
            query_string(&[("countBy", "launching".to_string())])
        );
        let response = self.send_empty(Request::get(&self.url(&path))).await?;
        parse(response).await
    }

    async fn update(&self, id: &str, body: &ProductionWorkflowUpdateBody) -> Result<(), ApiError> {
        let path = format!("/production-workflows/{}", urlencoding::encode(id));
        self.send_json(Request::put(&self.url(&path)), body).await?;
        Ok(())
    }

    async fn update_order_priority(
        &self,
        order_id: &str,
        body: &UpdateOrderPriorityBody,
    ) -> Result<(), ApiError> {
        let path = format!("/orders/{}", urlencoding::encode(order_id));
        self.send_json(Request::put(&self.url(&path)), body).await?;
        Ok(())
    }

    async fn assign_responsible(
        &self,
        body: &AssignResponsibleToProductionsBody,
    ) -> Result<(), ApiError> {
        self.send_json(Request::put(&self.url("/production-workflows/responsible")), body)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/production-workflows/{}", urlencoding::encode(id));
        self.send_empty(Request::delete(&self.url(&path))).await?;
        Ok(())
    }

    async fn delete_many(&self, body: &DeleteManyProductionsBody) -> Result<(), ApiError> {
        self.send_json(Request::post(&self.url("/production-workflows/delete-many")), body)
            .await?;
        Ok(())
    }

    async fn launch_bulk(&self, items: &[ProductionWorkflowMultiLaunchItem]) -> Result<(), ApiError> {
        self.send_json(Request::post(&self.url("/production-workflows/launch/bulk")), &items)
            .await?;
        Ok(())
    }

    async fn set_chosen_filters(&self, body: &SetChosenFiltersBody) -> Result<(), ApiError> {
        self.send_json(Request::post(&self.url("/production-workflows/chosen-filters")), body)
            .await?;
        Ok(())
    }

    async fn get_estimation_info(&self) -> Result<MinMax, ApiError> {
        let response = self
            .send_empty(Request::get(&self.url("/production-workflows/estimation-info")))
            .await?;
        parse(response).await
    }

    async fn get_product_types(&self, skip: u64, take: u64) -> Result<Vec<IdName>, ApiError> {
        let path = format!(
            "/product-types{}",
            query_string(&[("skip", skip.to_string()), ("take", take.to_string())])
        );
        let response = self.send_empty(Request::get(&self.url(&path))).await?;
        let page: PaginatedResponse<IdName> = parse(response).await?;
        Ok(page.data)
    }

    async fn get_user_production_filters(
        &self,
    ) -> Result<Option<GetProductionWorkflowsFilteredRequest>, ApiError> {
        let response = self
            .send_empty(Request::get(&self.url("/users/production-filters")))
            .await?;
        // Пустое тело тоже означает "ничего не сохранено"
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_users(&self, skip: u64, take: u64) -> Result<Vec<User>, ApiError> {
        let path = format!(
            "/users{}",
            query_string(&[("skip", skip.to_string()), ("take", take.to_string())])
        );
        let response = self.send_empty(Request::get(&self.url(&path))).await?;
        let page: PaginatedResponse<User> = parse(response).await?;
        Ok(page.data)
    }

    async fn get_current_user(&self) -> Result<User, ApiError> {
        let response = self.send_empty(Request::get(&self.url("/auth/me"))).await?;
        parse(response).await
    }
}
