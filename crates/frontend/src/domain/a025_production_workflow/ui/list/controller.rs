//! Оркестрация страницы производств: фильтры -> запрос -> список.
//!
//! The controller owns both stores and is the only place where they meet.
//! Every server-bound change runs as a [`Transaction`] or leaves the state
//! unchanged on failure; failures end in a notification, never a panic.

use contracts::domain::a025_production_workflow::live::LiveEvent;
use contracts::domain::a025_production_workflow::request::{
    AssignResponsibleToProductionsBody, DeleteManyProductionsBody,
    ProductionWorkflowMultiLaunchItem, ProductionWorkflowUpdateBody, SetChosenFiltersBody,
    UpdateOrderPriorityBody,
};
use contracts::domain::a025_production_workflow::{
    validate_ownership, FilterCriterion, GroupBy, ProductionItems, ProductionWorkflow,
};
use contracts::shared::common::IdName;
use leptos::prelude::*;
use std::sync::Arc;

use super::state::{self as list_state, ProductionListState};
use crate::domain::a025_production_workflow::api::{ApiError, ProductionApi};
use crate::domain::a025_production_workflow::filters::schema::FilterValue;
use crate::domain::a025_production_workflow::filters::state::{
    self as filters_state, DisplayRangeChange, ProductionFiltersState, ServerFilterOptions,
    ShowMoreTarget, SortChange,
};
use crate::domain::a025_production_workflow::filters::{prepare_request_body, set_user_filters};
use crate::domain::a025_production_workflow::tree::{
    remove_production, update_production_recursively, ProductionPatch, ProductionUpdate,
    UpdateArgs,
};
use crate::shared::config::ClientConfig;
use crate::shared::debounce::Debouncer;
use crate::shared::notify::Notifier;
use crate::shared::optimistic::Transaction;

const PRODUCT_TYPES_TAKE: u64 = 100;
const GENERIC_ERROR: &str = "Something went wrong";

/// Options of a list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductionsArgs {
    /// Start from the first page
    pub reset_skip_and_set_take_to_default: bool,
    /// Append the page instead of replacing the list
    pub is_infinity_scroll: bool,
    pub custom_group_by: Option<GroupBy>,
    /// Raise `is_fetching_data` while the request runs
    pub show_fetch_effect: bool,
    /// Re-read what is loaded; pagination, issues and grouping stay as they are
    pub reset_skip_preserve_take: bool,
}

impl Default for GetProductionsArgs {
    fn default() -> Self {
        Self {
            reset_skip_and_set_take_to_default: false,
            is_infinity_scroll: false,
            custom_group_by: None,
            show_fetch_effect: true,
            reset_skip_preserve_take: false,
        }
    }
}

impl GetProductionsArgs {
    fn first_page() -> Self {
        Self {
            reset_skip_and_set_take_to_default: true,
            ..Default::default()
        }
    }

    fn refresh_in_place() -> Self {
        Self {
            show_fetch_effect: false,
            reset_skip_preserve_take: true,
            ..Default::default()
        }
    }
}

/// Выбор ответственного для группового назначения
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsibleChoice {
    User(String),
    Unassigned,
}

impl ResponsibleChoice {
    fn into_id(self) -> Option<String> {
        match self {
            ResponsibleChoice::User(id) => Some(id),
            ResponsibleChoice::Unassigned => None,
        }
    }
}

fn production_items(state: &mut ProductionListState) -> &mut ProductionItems {
    &mut state.production_items
}

fn parse_error(error: serde_json::Error) -> ApiError {
    ApiError::Parse(error.to_string())
}

pub struct ProductionController<A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
    config: ClientConfig,
    pub filters: RwSignal<ProductionFiltersState>,
    pub list: RwSignal<ProductionListState>,
    filters_change_debounce: Arc<Debouncer>,
    chosen_filters_debounce: Arc<Debouncer>,
    search_debounce: Arc<Debouncer>,
}

impl<A, N> Clone for ProductionController<A, N> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            filters: self.filters,
            list: self.list,
            filters_change_debounce: self.filters_change_debounce.clone(),
            chosen_filters_debounce: self.chosen_filters_debounce.clone(),
            search_debounce: self.search_debounce.clone(),
        }
    }
}

impl<A, N> ProductionController<A, N>
where
    A: ProductionApi + 'static,
    N: Notifier + 'static,
{
    pub fn new(api: Arc<A>, notifier: Arc<N>, config: ClientConfig) -> Self {
        Self {
            filters: filters_state::create_state(config.page_size),
            list: list_state::create_state(),
            filters_change_debounce: Arc::new(Debouncer::new(config.filter_change_debounce())),
            chosen_filters_debounce: Arc::new(Debouncer::new(config.chosen_filters_debounce())),
            search_debounce: Arc::new(Debouncer::new(config.search_debounce())),
            api,
            notifier,
            config,
        }
    }

    fn report(&self, context: &str, error: &ApiError) {
        log::error!("{}: {}", context, error);
        self.notifier.error(&error.to_string());
    }

    // ---------------------------------------------------------------------
    // Загрузка
    // ---------------------------------------------------------------------

    /// Users, then filters (defaults before saved ones), then the first page
    pub async fn init_page_data(&self) {
        log::debug!("production page: init");
        futures::join!(self.load_users(), self.load_filters());
        self.get_productions_by_filter(GetProductionsArgs::default())
            .await;
    }

    pub async fn load_users(&self) {
        match self.api.get_users(0, self.config.users_page_size).await {
            Ok(users) => self.list.update(|s| s.users = users),
            Err(e) => self.report("failed to load users", &e),
        }
    }

    pub async fn load_filters(&self) {
        self.filters.update(|s| s.is_loading_filters = true);
        if let Err(e) = self.try_load_filters().await {
            self.report("failed to load filters", &e);
        }
        self.filters.update(|s| s.is_loading_filters = false);
    }

    async fn try_load_filters(&self) -> Result<(), ApiError> {
        let (estimated_time, product_types, current_user) = futures::join!(
            self.api.get_estimation_info(),
            self.api.get_product_types(0, PRODUCT_TYPES_TAKE),
            self.api.get_current_user(),
        );
        let options = ServerFilterOptions {
            product_types: product_types?,
            estimated_time: estimated_time?,
            current_user: current_user?,
        };
        self.filters.update(|s| s.load_defaults(options));

        if let Some(saved) = self.api.get_user_production_filters().await? {
            self.filters.update(|s| set_user_filters(s, &saved));
        }
        Ok(())
    }

    pub async fn get_productions_by_filter(&self, args: GetProductionsArgs) {
        log::debug!("production page: fetch {:?}", args);
        if args.show_fetch_effect {
            self.filters.update(|s| s.is_fetching_data = true);
        }
        if args.reset_skip_and_set_take_to_default {
            self.filters.update(|s| s.reset_pagination_cursor());
        }

        if let Err(e) = self.fetch_productions(args).await {
            log::error!("failed to load productions: {}", e);
            self.notifier.error(GENERIC_ERROR);
        }

        if args.show_fetch_effect {
            self.filters.update(|s| s.is_fetching_data = false);
        }
    }

    async fn fetch_productions(&self, args: GetProductionsArgs) -> Result<(), ApiError> {
        let body = self.filters.with_untracked(|s| {
            prepare_request_body(s, args.custom_group_by, args.reset_skip_preserve_take)
        });

        let (list, issues, launching) = futures::join!(
            self.api.get_all(&body),
            self.api.get_issues(&body),
            self.api.get_launching_count(),
        );
        let (list, issues, launching) = (list?, issues?, launching?);

        if launching > 0 {
            self.list.update(|s| s.launching_progress.show(launching));
        }

        let items = ProductionItems::from_json(body.group_by, list.data).map_err(parse_error)?;
        let roots: Vec<_> = items.top_level().into_iter().cloned().collect();
        for violation in validate_ownership(&roots) {
            log::warn!(
                "production {}: broken ownership link: {}",
                violation.production_id,
                violation.reason
            );
        }
        self.list.update(|s| {
            if args.is_infinity_scroll {
                s.production_items.append(items);
            } else {
                s.production_items = items;
            }
        });

        if !args.reset_skip_preserve_take {
            self.filters
                .update(|s| s.apply_list_response(&list.meta, issues, args.custom_group_by));
        }
        Ok(())
    }

    /// Next page for infinite scroll; nothing to do on the last page
    pub async fn load_more_productions(&self) {
        if !self.filters.with_untracked(|s| s.pagination.has_more()) {
            return;
        }
        self.filters.update(|s| s.is_infinity_scroll_load = true);
        self.get_productions_by_filter(GetProductionsArgs {
            is_infinity_scroll: true,
            show_fetch_effect: false,
            ..Default::default()
        })
        .await;
        self.filters.update(|s| s.is_infinity_scroll_load = false);
    }

    // ---------------------------------------------------------------------
    // Изменения производств
    // ---------------------------------------------------------------------

    /// Optimistic field update.
    ///
    /// The patched tree is published before the request goes out. A failed
    /// request puts the exact previous tree back; a successful one refreshes
    /// the loaded rows so server-computed fields catch up. The page spawns
    /// this with `spawn_local` and never awaits it, so the refresh does not
    /// block the editor.
    pub async fn update_production(
        &self,
        id: &str,
        patch: ProductionPatch,
        is_update_responsible: bool,
    ) {
        let target_id = patch
            .order
            .as_ref()
            .map(|order| order.order_id.clone())
            .unwrap_or_else(|| id.to_string());
        let update = ProductionUpdate::Patch(patch.clone());

        let tx = Transaction::begin(self.list, production_items);
        tx.apply(|items| {
            let updated = update_production_recursively(UpdateArgs {
                id: &target_id,
                value: &update,
                items,
            });
            *items = updated;
        });

        let result = match &patch.order {
            Some(order) => {
                let body = UpdateOrderPriorityBody {
                    priority: order.priority,
                };
                self.api.update_order_priority(&order.order_id, &body).await
            }
            None => {
                let body = ProductionWorkflowUpdateBody {
                    title: patch.title.clone(),
                    status: patch.status,
                    priority: patch.priority,
                    responsible_id: is_update_responsible.then(|| {
                        patch
                            .responsible
                            .clone()
                            .flatten()
                            .map(|responsible| responsible.id)
                    }),
                };
                self.api.update(id, &body).await
            }
        };

        match result {
            Ok(()) => {
                tx.commit();
                self.get_productions_by_filter(GetProductionsArgs::refresh_in_place())
                    .await;
            }
            Err(e) => {
                tx.rollback();
                self.report("failed to update production", &e);
            }
        }
    }

    pub async fn assign_responsible_to_selected(&self, choice: ResponsibleChoice) {
        let production_ids = self.list.with_untracked(|s| s.selection.selected_ids());
        if production_ids.is_empty() {
            return;
        }
        self.list
            .update(|s| s.assigning_responsible_to_production_ids = production_ids.clone());

        let body = AssignResponsibleToProductionsBody {
            production_ids,
            responsible_id: choice.into_id(),
        };
        match self.api.assign_responsible(&body).await {
            Ok(()) => {
                self.get_productions_by_filter(GetProductionsArgs::refresh_in_place())
                    .await;
                self.notifier.success("Successfully updated");
            }
            Err(e) => self.report("failed to assign responsible", &e),
        }

        self.list
            .update(|s| s.assigning_responsible_to_production_ids.clear());
    }

    pub async fn delete_production(&self, id: &str) {
        if let Err(e) = self.api.delete(id).await {
            self.report("failed to delete production", &e);
            return;
        }
        self.get_productions_by_filter(GetProductionsArgs::refresh_in_place())
            .await;
        self.list.update(|s| {
            s.production_items = remove_production(&s.production_items, id);
            s.selection.selected.retain(|node| node.id != id);
        });
        self.notifier.success("Deleted successfully");
    }

    /// Deletes the whole selection; only when every selected node may go
    pub async fn delete_selected(&self) {
        let ids = self
            .list
            .with_untracked(|s| s.is_delete_enabled().then(|| s.selection.selected_ids()));
        let Some(productions_ids) = ids else {
            log::warn!("delete requested for a selection that cannot be deleted");
            return;
        };

        let body = DeleteManyProductionsBody {
            productions_ids: productions_ids.clone(),
        };
        if let Err(e) = self.api.delete_many(&body).await {
            self.report("failed to delete productions", &e);
            return;
        }
        self.get_productions_by_filter(GetProductionsArgs::refresh_in_place())
            .await;
        self.list.update(|s| {
            for id in &productions_ids {
                s.production_items = remove_production(&s.production_items, id);
            }
            s.selection.toggle_multi_actions(false);
        });
        self.notifier.success("Deleted successfully");
    }

    /// Bulk launch of the selected root productions
    pub async fn launch_selected(&self) {
        let ids = self
            .list
            .with_untracked(|s| s.is_mass_launch_possible().then(|| s.selection.selected_ids()));
        let Some(ids) = ids else {
            log::warn!("mass launch is not possible for the current selection");
            return;
        };

        self.list.update(|s| {
            s.add_launching_ids(&ids);
            s.launching_progress.show(ids.len() as u64);
        });

        let items: Vec<ProductionWorkflowMultiLaunchItem> = ids
            .iter()
            .map(|id| ProductionWorkflowMultiLaunchItem {
                production_workflow_id: id.clone(),
            })
            .collect();
        match self.api.launch_bulk(&items).await {
            Ok(()) => self.list.update(|s| s.selection.toggle_multi_actions(false)),
            Err(e) => {
                self.list.update(|s| {
                    s.remove_launching_ids(&ids);
                    s.launching_progress.hide();
                });
                self.report("failed to launch productions", &e);
            }
        }
    }

    /// Live-channel message. Safe to receive twice.
    pub fn handle_live_event(&self, event: LiveEvent) {
        match event {
            LiveEvent::LaunchFailed(data) => {
                let production = data.production;
                log::warn!("launch of {} failed: {}", production.id, data.error);
                self.notifier.error(&format!(
                    "Production {} ({}) wasn't launched",
                    production.title, production.production_key
                ));
                self.list
                    .update(|s| s.remove_launching_ids(std::slice::from_ref(&production.id)));
            }
            LiveEvent::LaunchFinished(data) => {
                let remaining = data.launching_productions_count;
                let production: Arc<ProductionWorkflow> = Arc::new(data.production);
                let id = production.id.clone();
                let update = ProductionUpdate::Replace(production);
                self.list.update(|s| {
                    s.production_items = update_production_recursively(UpdateArgs {
                        id: &id,
                        value: &update,
                        items: &s.production_items,
                    });
                    s.remove_launching_ids(std::slice::from_ref(&id));
                    if remaining == 0 {
                        s.launching_progress.hide();
                    } else {
                        s.launching_progress.show(remaining);
                    }
                });
                if remaining == 0 {
                    self.notifier.success("Successfully launched");
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Фильтры
    // ---------------------------------------------------------------------

    /// Applies the values at once and refetches when no newer change
    /// arrives within the debounce delay
    pub async fn on_filters_change(&self, changes: Vec<(FilterCriterion, FilterValue)>) {
        self.filters.update(|s| s.apply_filter_change(changes));
        if self.filters_change_debounce.wait().await {
            self.get_productions_by_filter(GetProductionsArgs::first_page())
                .await;
        }
    }

    pub async fn on_search_query_change(&self, text: String) {
        self.filters.update(|s| {
            s.apply_filter_change(vec![(FilterCriterion::SearchQuery, FilterValue::Text(text))])
        });
        if self.search_debounce.wait().await {
            self.get_productions_by_filter(GetProductionsArgs::first_page())
                .await;
        }
    }

    pub fn change_filter_options(&self, criterion: FilterCriterion, options: Vec<IdName>) {
        self.filters
            .update(|s| s.change_filter_options(criterion, options));
    }

    pub async fn on_change_sort(&self, change: SortChange) {
        let changed = self
            .filters
            .try_update(|s| s.change_sort(change))
            .unwrap_or(false);
        if changed {
            self.get_productions_by_filter(GetProductionsArgs::first_page())
                .await;
        }
    }

    pub async fn on_group_by_change(&self, group_by: GroupBy) {
        let changed = self
            .filters
            .try_update(|s| s.change_group_by(group_by))
            .unwrap_or(false);
        if !changed {
            return;
        }
        self.list.update(|s| s.selection.toggle_multi_actions(false));
        self.get_productions_by_filter(GetProductionsArgs::first_page())
            .await;
    }

    /// Updates the visible criteria, refetches if values were dropped, and
    /// saves the choice after the debounce delay
    pub async fn on_select_filters(&self, values: Vec<FilterCriterion>, toggled: FilterCriterion) {
        let chosen_filters = values.clone();
        // Порядок сохранений задаётся моментом вызова, а не окончанием перезапроса
        let ticket = self.chosen_filters_debounce.arm();
        let refetch = self
            .filters
            .try_update(|s| s.select_filters(values, toggled))
            .unwrap_or(false);
        if refetch {
            self.get_productions_by_filter(GetProductionsArgs::first_page())
                .await;
        }

        if !self.chosen_filters_debounce.settle(ticket).await {
            return;
        }
        if let Err(e) = self
            .api
            .set_chosen_filters(&SetChosenFiltersBody { chosen_filters })
            .await
        {
            self.report("failed to save chosen filters", &e);
        }
    }

    pub async fn change_display_range(&self, change: DisplayRangeChange) {
        self.filters.update(|s| s.change_display_range(change));
        self.get_productions_by_filter(GetProductionsArgs::first_page())
            .await;
    }

    pub async fn clear_filters(&self) {
        self.filters.update(|s| s.reset_filters(None));
        self.get_productions_by_filter(GetProductionsArgs::first_page())
            .await;
    }

    /// Sets or drops the drill-down filter; the list switches to plane view
    pub async fn handle_additional_filter(&self, additional_filter: Option<IdName>) {
        self.filters
            .update(|s| s.set_additional_filter(additional_filter));
        self.get_productions_by_filter(GetProductionsArgs {
            custom_group_by: Some(GroupBy::None),
            ..GetProductionsArgs::first_page()
        })
        .await;
    }

    pub async fn handle_show_more(&self, target: ShowMoreTarget<'_>) {
        self.handle_additional_filter(Some(target.additional_filter()))
            .await;
    }

    /// Back to defaults when the page unmounts
    pub fn clear_filter_state(&self) {
        self.filters
            .set(ProductionFiltersState::with_page_size(self.config.page_size));
    }

    pub fn is_filters_dirty(&self) -> bool {
        self.filters.with(|s| s.is_filters_dirty())
    }

    // ---------------------------------------------------------------------
    // Выбор и раскрытие
    // ---------------------------------------------------------------------

    pub fn toggle_opened(&self, id: &str) {
        self.list.update(|s| s.toggle_opened(id));
    }

    pub fn toggle_multi_actions(&self, enabled: bool) {
        self.list
            .update(|s| s.selection.toggle_multi_actions(enabled));
    }

    pub fn toggle_select_one(&self, node: &Arc<ProductionWorkflow>, parent_id: Option<&str>) {
        self.list
            .update(|s| s.selection.toggle_one(node, parent_id));
    }

    pub fn toggle_select_batch(&self, batch: &[Arc<ProductionWorkflow>]) {
        self.list.update(|s| s.selection.toggle_batch(batch));
    }

    /// Select-all also expands every selected node that has nested ones
    pub fn select_or_deselect_all(&self, reset_all: bool) {
        self.list.update(|s| {
            let to_expand = s
                .selection
                .select_or_deselect_all(&s.production_items, reset_all);
            if !to_expand.is_empty() {
                s.opened_production_ids = to_expand;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::domain::a025_production_workflow::live::{LaunchFailedData, LaunchFinishedData};
    use contracts::domain::a025_production_workflow::request::{
        GetProductionWorkflowsFilteredRequest, SkipTake,
    };
    use contracts::domain::a025_production_workflow::response::{
        ProductionIssuesSummary, ProductionWorkflowListResponse,
    };
    use contracts::domain::a025_production_workflow::{
        Priority, ProductionOrderSummary, ProductionSortBy, ProductionStatus,
    };
    use contracts::shared::common::{MinMax, PaginationMeta};
    use contracts::system::users::User;
    use futures::channel::oneshot;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::domain::a025_production_workflow::tree::{find_production, OrderPriorityPatch};
    use crate::shared::notify::NotificationKind;

    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        list_bodies: Mutex<Vec<GetProductionWorkflowsFilteredRequest>>,
        roots: Mutex<Vec<Arc<ProductionWorkflow>>>,
        meta: Mutex<PaginationMeta>,
        saved_filters: Mutex<Option<GetProductionWorkflowsFilteredRequest>>,
        saved_chosen_filters: Mutex<Vec<Vec<FilterCriterion>>>,
        fail_writes: AtomicBool,
        /// Holds the next list request until the sender fires
        list_gate: Mutex<Option<oneshot::Receiver<()>>>,
        update_gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl FakeApi {
        fn with_roots(roots: Vec<Arc<ProductionWorkflow>>) -> Self {
            let api = FakeApi::default();
            *api.meta.lock().unwrap() = PaginationMeta {
                total: roots.len() as u64,
                last_page: 1,
                current_page: 1,
                per_page: 25,
                prev: None,
                next: None,
            };
            *api.roots.lock().unwrap() = roots;
            api
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn write(&self, call: String) -> Result<(), ApiError> {
            self.record(call);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl ProductionApi for FakeApi {
        async fn get_all(
            &self,
            body: &GetProductionWorkflowsFilteredRequest,
        ) -> Result<ProductionWorkflowListResponse, ApiError> {
            self.record("get_all");
            self.list_bodies.lock().unwrap().push(body.clone());
            let gate = self.list_gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let roots = self.roots.lock().unwrap().clone();
            Ok(ProductionWorkflowListResponse {
                data: serde_json::to_value(&roots).unwrap(),
                meta: self.meta.lock().unwrap().clone(),
            })
        }

        async fn get_issues(
            &self,
            _body: &GetProductionWorkflowsFilteredRequest,
        ) -> Result<ProductionIssuesSummary, ApiError> {
            Ok(ProductionIssuesSummary {
                issues_count: 3,
                ..Default::default()
            })
        }

        async fn get_launching_count(&self) -> Result<u64, ApiError> {
            Ok(0)
        }

        async fn update(&self, id: &str, body: &ProductionWorkflowUpdateBody) -> Result<(), ApiError> {
            let gate = self.update_gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.write(format!("update:{}:{:?}", id, body.responsible_id))
        }

        async fn update_order_priority(
            &self,
            order_id: &str,
            body: &UpdateOrderPriorityBody,
        ) -> Result<(), ApiError> {
            self.write(format!("update_order:{}:{:?}", order_id, body.priority))
        }

        async fn assign_responsible(
            &self,
            body: &AssignResponsibleToProductionsBody,
        ) -> Result<(), ApiError> {
            self.write(format!("assign:{:?}", body.responsible_id))
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.write(format!("delete:{}", id))
        }

        async fn delete_many(&self, body: &DeleteManyProductionsBody) -> Result<(), ApiError> {
            self.write(format!("delete_many:{}", body.productions_ids.join(",")))
        }

        async fn launch_bulk(&self, items: &[ProductionWorkflowMultiLaunchItem]) -> Result<(), ApiError> {
            self.write(format!("launch:{}", items.len()))
        }

        async fn set_chosen_filters(&self, body: &SetChosenFiltersBody) -> Result<(), ApiError> {
            self.saved_chosen_filters
                .lock()
                .unwrap()
                .push(body.chosen_filters.clone());
            self.write(format!("chosen:{}", body.chosen_filters.len()))
        }

        async fn get_estimation_info(&self) -> Result<MinMax, ApiError> {
            Ok(MinMax::new(0.0, 120.0))
        }

        async fn get_product_types(&self, _skip: u64, _take: u64) -> Result<Vec<IdName>, ApiError> {
            Ok(vec![IdName::new("t1", "Chair")])
        }

        async fn get_user_production_filters(
            &self,
        ) -> Result<Option<GetProductionWorkflowsFilteredRequest>, ApiError> {
            self.record("get_user_production_filters");
            Ok(self.saved_filters.lock().unwrap().clone())
        }

        async fn get_users(&self, _skip: u64, _take: u64) -> Result<Vec<User>, ApiError> {
            Ok(vec![current_user()])
        }

        async fn get_current_user(&self) -> Result<User, ApiError> {
            Ok(current_user())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        items: Mutex<Vec<(NotificationKind, String)>>,
    }

    impl RecordingNotifier {
        fn kinds(&self) -> Vec<NotificationKind> {
            self.items.lock().unwrap().iter().map(|(kind, _)| *kind).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, kind: NotificationKind, message: &str) {
            self.items.lock().unwrap().push((kind, message.to_string()));
        }
    }

    fn current_user() -> User {
        User {
            id: "u1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: None,
            avatar: None,
            user_position_slots: Vec::new(),
        }
    }

    fn production(id: &str, order_id: &str, nested: Vec<Arc<ProductionWorkflow>>) -> Arc<ProductionWorkflow> {
        Arc::new(ProductionWorkflow {
            id: id.to_string(),
            title: id.to_uppercase(),
            production_key: format!("K-{}", id),
            order: ProductionOrderSummary {
                id: order_id.to_string(),
                ..Default::default()
            },
            nested_workflows: nested,
            ..Default::default()
        })
    }

    fn roots() -> Vec<Arc<ProductionWorkflow>> {
        let child = Arc::new(ProductionWorkflow {
            id: "a-1".to_string(),
            main_root_id: Some("a".to_string()),
            parent_production_workflow_id: Some("a".to_string()),
            ..Default::default()
        });
        vec![production("a", "o1", vec![child]), production("b", "o2", vec![])]
    }

    type TestController = ProductionController<FakeApi, RecordingNotifier>;

    fn controller(api: FakeApi) -> (TestController, Arc<FakeApi>, Arc<RecordingNotifier>) {
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::default());
        let config = ClientConfig {
            api_base_url: Some("http://localhost:3000".to_string()),
            ..ClientConfig::default()
        }
        .without_debounce();
        (
            ProductionController::new(api.clone(), notifier.clone(), config),
            api,
            notifier,
        )
    }

    async fn loaded(api: FakeApi) -> (TestController, Arc<FakeApi>, Arc<RecordingNotifier>) {
        let (ctrl, api, notifier) = controller(api);
        ctrl.init_page_data().await;
        (ctrl, api, notifier)
    }

    #[tokio::test]
    async fn test_init_loads_filters_before_first_fetch() {
        let api = FakeApi::with_roots(roots());
        *api.saved_filters.lock().unwrap() = Some(GetProductionWorkflowsFilteredRequest {
            sort: contracts::domain::a025_production_workflow::request::ProductionSortParams {
                sort_by: ProductionSortBy::Progress,
                ..Default::default()
            },
            ..Default::default()
        });
        let (ctrl, api, notifier) = loaded(api).await;

        assert_eq!(api.calls(), vec!["get_user_production_filters", "get_all"]);
        let body = api.list_bodies.lock().unwrap()[0].clone();
        assert_eq!(body.sort.sort_by, ProductionSortBy::Progress);

        let list = ctrl.list.get_untracked();
        assert_eq!(list.users.len(), 1);
        assert_eq!(list.production_items.len(), 2);
        let filters = ctrl.filters.get_untracked();
        assert_eq!(filters.issues.issues_count, 3);
        assert_eq!(filters.pagination.total, 2);
        assert!(!filters.is_loading_filters);
        assert!(!filters.is_fetching_data);
        assert!(notifier.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_restores_previous_tree() {
        let (ctrl, api, notifier) = loaded(FakeApi::with_roots(roots())).await;
        let before = ctrl.list.get_untracked().production_items;
        api.fail_writes.store(true, Ordering::SeqCst);

        ctrl.update_production(
            "a-1",
            ProductionPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
            false,
        )
        .await;

        let after = ctrl.list.get_untracked().production_items;
        assert_eq!(after, before);
        match (&after, &before) {
            (ProductionItems::Plane(after), ProductionItems::Plane(before)) => {
                assert!(Arc::ptr_eq(&after[0], &before[0]));
                assert!(Arc::ptr_eq(&after[1], &before[1]));
            }
            _ => panic!("plane view expected"),
        }
        assert_eq!(notifier.kinds(), vec![NotificationKind::Error]);
        // После отката список не перезапрашивается
        assert_eq!(api.calls().iter().filter(|c| *c == "get_all").count(), 1);
    }

    #[tokio::test]
    async fn test_successful_update_refreshes_in_place() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.filters.update(|s| s.pagination.next = Some(25));

        ctrl.update_production(
            "b",
            ProductionPatch {
                responsible: Some(None),
                ..Default::default()
            },
            true,
        )
        .await;

        let calls = api.calls();
        assert_eq!(&calls[calls.len() - 2..], ["update:b:Some(None)", "get_all"]);
        let bodies = api.list_bodies.lock().unwrap();
        assert_eq!(bodies.last().unwrap().pagination, Some(SkipTake { skip: 0, take: 25 }));
        // Пагинация в режиме "обновить на месте" не меняется
        assert_eq!(ctrl.filters.get_untracked().pagination.next, Some(25));
    }

    #[tokio::test]
    async fn test_order_priority_goes_to_orders_endpoint() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        api.fail_writes.store(true, Ordering::SeqCst);

        ctrl.update_production(
            "a",
            ProductionPatch {
                order: Some(OrderPriorityPatch {
                    order_id: "o1".to_string(),
                    priority: Priority::Highest,
                }),
                ..Default::default()
            },
            false,
        )
        .await;

        assert!(api.calls().contains(&"update_order:o1:Highest".to_string()));
        let items = ctrl.list.get_untracked().production_items;
        let node = find_production(&items, "a").unwrap();
        assert_eq!(node.order.priority, Priority::default());
    }

    #[tokio::test]
    async fn test_load_more_stops_on_last_page() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.load_more_productions().await;
        assert_eq!(api.calls().iter().filter(|c| *c == "get_all").count(), 1);

        ctrl.filters.update(|s| {
            s.pagination.current_page = 1;
            s.pagination.last_page = 2;
            s.pagination.next = Some(2);
        });
        ctrl.load_more_productions().await;
        assert_eq!(ctrl.list.get_untracked().production_items.len(), 4);
        assert!(!ctrl.filters.get_untracked().is_infinity_scroll_load);
    }

    #[tokio::test]
    async fn test_launch_selected_and_failure_cleanup() {
        let (ctrl, api, notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.launch_selected().await;
        assert!(!api.calls().iter().any(|c| c.starts_with("launch")));

        let selected = ctrl.list.get_untracked().production_items.top_level()[0].clone();
        ctrl.toggle_select_one(&selected, None);
        api.fail_writes.store(true, Ordering::SeqCst);
        ctrl.launch_selected().await;

        let list = ctrl.list.get_untracked();
        assert!(api.calls().contains(&"launch:1".to_string()));
        assert!(!list.is_launching("a"));
        assert!(!list.launching_progress.visible);
        assert_eq!(notifier.kinds(), vec![NotificationKind::Error]);

        api.fail_writes.store(false, Ordering::SeqCst);
        ctrl.launch_selected().await;
        let list = ctrl.list.get_untracked();
        assert!(list.is_launching("a"));
        assert!(list.selection.selected.is_empty());
    }

    #[tokio::test]
    async fn test_live_events_are_idempotent() {
        let (ctrl, _api, notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.list.update(|s| {
            s.add_launching_ids(&["a".to_string(), "b".to_string()]);
            s.launching_progress.show(2);
        });

        let mut launched = ProductionWorkflow::clone(&production("a", "o1", vec![]));
        launched.status = ProductionStatus::InProgress;
        let finished = LiveEvent::LaunchFinished(LaunchFinishedData {
            production: launched,
            launching_productions_count: 1,
        });
        ctrl.handle_live_event(finished.clone());
        ctrl.handle_live_event(finished);

        let list = ctrl.list.get_untracked();
        let node = find_production(&list.production_items, "a").unwrap();
        assert_eq!(node.status, ProductionStatus::InProgress);
        assert!(!list.is_launching("a"));
        assert_eq!(list.launching_progress.count, 1);

        let failed = LiveEvent::LaunchFailed(LaunchFailedData {
            production: ProductionWorkflow::clone(&production("b", "o2", vec![])),
            error: serde_json::Value::Null,
        });
        ctrl.handle_live_event(failed);
        assert!(!ctrl.list.get_untracked().is_launching("b"));
        let messages = notifier.items.lock().unwrap().clone();
        assert_eq!(messages[0].1, "Production B (K-b) wasn't launched");

        ctrl.handle_live_event(LiveEvent::LaunchFinished(LaunchFinishedData {
            production: ProductionWorkflow::clone(&production("b", "o2", vec![])),
            launching_productions_count: 0,
        }));
        assert!(!ctrl.list.get_untracked().launching_progress.visible);
        assert_eq!(notifier.kinds().last(), Some(&NotificationKind::Success));
    }

    #[tokio::test]
    async fn test_same_sort_does_not_refetch() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.on_change_sort(SortChange {
            sort_by: Some(ProductionSortBy::DeadlineAt),
            order: None,
        })
        .await;
        assert_eq!(api.calls().iter().filter(|c| *c == "get_all").count(), 1);

        ctrl.on_group_by_change(GroupBy::None).await;
        assert_eq!(api.calls().iter().filter(|c| *c == "get_all").count(), 1);

        ctrl.on_change_sort(SortChange {
            sort_by: Some(ProductionSortBy::Progress),
            order: None,
        })
        .await;
        assert_eq!(api.calls().iter().filter(|c| *c == "get_all").count(), 2);
    }

    #[tokio::test]
    async fn test_select_filters_persists_choice() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.on_filters_change(vec![(
            FilterCriterion::ResponsibilityDepartment,
            FilterValue::Ids(vec![IdName::new("d1", "Shop")]),
        )])
        .await;
        assert!(ctrl.is_filters_dirty());

        ctrl.on_select_filters(
            vec![FilterCriterion::FirstWorkflowEstimatedTime],
            FilterCriterion::ResponsibilityDepartment,
        )
        .await;

        assert!(!ctrl.is_filters_dirty());
        let calls = api.calls();
        assert_eq!(calls.last().map(String::as_str), Some("chosen:1"));
        assert_eq!(calls.iter().filter(|c| *c == "get_all").count(), 3);
    }

    #[tokio::test]
    async fn test_show_more_switches_to_plane_view() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.filters.update(|s| s.group_by = GroupBy::Order);
        let group = contracts::domain::a025_production_workflow::ProductionWorkflowOrderGroup {
            id: "o1".to_string(),
            order_key: "ORD-1".to_string(),
            ..Default::default()
        };

        ctrl.handle_show_more(ShowMoreTarget::Order(&group)).await;

        let body = api.list_bodies.lock().unwrap().last().cloned().unwrap();
        assert_eq!(body.group_by, GroupBy::None);
        assert_eq!(body.filters.limit_by.map(|l| l.value), Some("ORD-1".to_string()));
        assert_eq!(ctrl.filters.get_untracked().group_by, GroupBy::None);
    }

    #[tokio::test]
    async fn test_delete_and_assign() {
        let (ctrl, api, notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.delete_production("b").await;
        // Фейковый сервер всё ещё возвращает "b", удаление применяется после обновления
        assert!(find_production(&ctrl.list.get_untracked().production_items, "b").is_none());

        ctrl.select_or_deselect_all(false);
        let list = ctrl.list.get_untracked();
        assert_eq!(list.selection.selected.len(), 2);
        assert!(list.is_opened("a"));

        ctrl.assign_responsible_to_selected(ResponsibleChoice::Unassigned)
            .await;
        assert!(api.calls().contains(&"assign:None".to_string()));
        assert!(ctrl
            .list
            .get_untracked()
            .assigning_responsible_to_production_ids
            .is_empty());
        assert_eq!(
            notifier.kinds(),
            vec![NotificationKind::Success, NotificationKind::Success]
        );
    }

    #[tokio::test]
    async fn test_chosen_filters_saved_in_call_order() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        ctrl.filters.update(|s| {
            s.apply_filter_change(vec![(
                FilterCriterion::ResponsibilityDepartment,
                FilterValue::Ids(vec![IdName::new("d1", "Shop")]),
            )])
        });
        let (release, gate) = oneshot::channel();
        *api.list_gate.lock().unwrap() = Some(gate);

        // Первый вызов ждёт перезапрос, второй приходит и сохраняется раньше
        let dropping = ctrl.on_select_filters(
            vec![FilterCriterion::FirstWorkflowEstimatedTime],
            FilterCriterion::ResponsibilityDepartment,
        );
        let adding = async {
            ctrl.on_select_filters(
                vec![FilterCriterion::FirstWorkflowEstimatedTime, FilterCriterion::Client],
                FilterCriterion::Client,
            )
            .await;
            let _ = release.send(());
        };
        futures::join!(dropping, adding);

        let saved = api.saved_chosen_filters.lock().unwrap().clone();
        assert_eq!(
            saved.last(),
            Some(&vec![FilterCriterion::FirstWorkflowEstimatedTime, FilterCriterion::Client])
        );
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn test_optimistic_patch_visible_while_request_pending() {
        let (ctrl, api, _notifier) = loaded(FakeApi::with_roots(roots())).await;
        let (release, gate) = oneshot::channel();
        *api.update_gate.lock().unwrap() = Some(gate);

        let update = ctrl.update_production(
            "b",
            ProductionPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
            false,
        );
        let observe = async {
            tokio::task::yield_now().await;
            let items = ctrl.list.get_untracked().production_items;
            let title = find_production(&items, "b").map(|node| node.title.clone());
            let _ = release.send(());
            title
        };
        let ((), title_in_flight) = futures::join!(update, observe);

        assert_eq!(title_in_flight.as_deref(), Some("Renamed"));
        assert_eq!(api.calls().iter().filter(|c| *c == "get_all").count(), 2);
    }

    #[tokio::test]
    async fn test_broken_ownership_links_still_load() {
        let orphan = Arc::new(ProductionWorkflow {
            id: "orphan".to_string(),
            main_root_id: Some("elsewhere".to_string()),
            ..Default::default()
        });
        let root = production("r", "o1", vec![orphan]);
        let (ctrl, _api, notifier) = loaded(FakeApi::with_roots(vec![root])).await;

        let items = ctrl.list.get_untracked().production_items;
        assert!(find_production(&items, "orphan").is_some());
        assert!(notifier.kinds().is_empty());
    }
}
