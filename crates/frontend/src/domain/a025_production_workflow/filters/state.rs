use contracts::domain::a025_production_workflow::response::ProductionIssuesSummary;
use contracts::domain::a025_production_workflow::{
    FilterCriterion, GroupBy, ProductionSortBy, ProductionWorkflowOrderGroup,
    ProductionWorkflowProductGroup, ShowCompletedPeriod,
};
use contracts::shared::common::{IdName, MinMax, PaginationMeta, SortOrder};
use contracts::system::users::User;
use leptos::prelude::*;

use super::schema::{
    FilterCriterionExt, FilterKind, FilterValue, MinMaxFilter, ProductionFilters, ShortcutOption,
    DEFAULT_SELECTED_FILTERS, NULL_OPTION_ID, SELECTABLE_FILTERS,
};
use crate::shared::config::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub total: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub current_page: u64,
    pub prev: Option<u64>,
    /// Offset of the next page; `None` once the last page is loaded
    pub next: Option<u64>,
}

impl PaginationState {
    pub fn with_page_size(per_page: u64) -> Self {
        Self {
            total: 0,
            per_page,
            last_page: 0,
            current_page: 1,
            prev: Some(0),
            next: Some(0),
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub sort_by: ProductionSortBy,
    pub order: SortOrder,
}

/// Partial sort change coming from the sort control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortChange {
    pub sort_by: Option<ProductionSortBy>,
    pub order: Option<SortOrder>,
}

/// Partial change of the "show completed" control
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayRangeChange {
    pub radio: Option<ShowCompletedPeriod>,
    pub value: Option<IdName>,
    pub options: Option<Vec<IdName>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub department_ids: Vec<String>,
}

/// Server data merged into the static filter schema on page load
#[derive(Debug, Clone)]
pub struct ServerFilterOptions {
    pub product_types: Vec<IdName>,
    pub estimated_time: MinMax,
    pub current_user: User,
}

/// Group whose "show more" link was clicked
#[derive(Debug, Clone, Copy)]
pub enum ShowMoreTarget<'a> {
    Order(&'a ProductionWorkflowOrderGroup),
    Product(&'a ProductionWorkflowProductGroup),
}

impl ShowMoreTarget<'_> {
    /// Drill-down filter: order key for orders, product id for products
    pub fn additional_filter(&self) -> IdName {
        match self {
            ShowMoreTarget::Order(group) => IdName::new(
                group.order_key.clone(),
                format!("Order: {}", group.order_key),
            ),
            ShowMoreTarget::Product(group) => {
                let name = group.name.as_deref().unwrap_or("Unknown");
                let kind = group
                    .product_type
                    .as_deref()
                    .map(|t| format!(" - {}", t))
                    .unwrap_or_default();
                let vendor = group
                    .vendor
                    .as_deref()
                    .map(|v| format!(" - {}", v))
                    .unwrap_or_default();
                IdName::new(group.id.clone(), format!("Product: {}{}{}", name, kind, vendor))
            }
        }
    }
}

/// Состояние панели фильтров производственного списка
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionFiltersState {
    pub filters: ProductionFilters,
    pub group_by: GroupBy,
    pub pagination: PaginationState,
    pub sort: SortState,
    /// Criteria currently shown in the filter bar. Independent of whether
    /// they hold a value.
    pub filter_selector: Vec<FilterCriterion>,
    /// "Show more" drill-down, compiled into `limit_by`
    pub additional_filter: Option<IdName>,
    pub filter_with_all_issues: bool,
    pub issues: ProductionIssuesSummary,
    pub current_user: CurrentUser,
    pub is_loading_filters: bool,
    pub is_fetching_data: bool,
    pub is_infinity_scroll_load: bool,
}

impl Default for ProductionFiltersState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ProductionFiltersState {
    pub fn with_page_size(per_page: u64) -> Self {
        Self {
            filters: ProductionFilters::default(),
            group_by: GroupBy::None,
            pagination: PaginationState::with_page_size(per_page),
            sort: SortState::default(),
            filter_selector: DEFAULT_SELECTED_FILTERS.to_vec(),
            additional_filter: None,
            filter_with_all_issues: false,
            issues: ProductionIssuesSummary::default(),
            current_user: CurrentUser::default(),
            is_loading_filters: false,
            is_fetching_data: false,
            is_infinity_scroll_load: false,
        }
    }

    pub fn filter_selector_options() -> &'static [FilterCriterion] {
        &SELECTABLE_FILTERS
    }

    /// Merges server options and current-user shortcuts into the schema.
    /// Selected values are left alone.
    pub fn load_defaults(&mut self, options: ServerFilterOptions) {
        let user = options.current_user;
        let department_ids = user.department_ids();
        let my_department = department_ids.first().cloned();
        self.current_user = CurrentUser {
            id: user.id.clone(),
            department_ids,
        };

        let filters = &mut self.filters;
        if let Some(responsible) = filters.id_list_mut(FilterCriterion::Responsible) {
            responsible.shortcut_options = vec![
                ShortcutOption {
                    id: user.id.clone(),
                    name: "Me".to_string(),
                    value: Some(user.full_name()),
                },
                ShortcutOption::new(NULL_OPTION_ID, "No responsible"),
            ];
        }
        for (criterion, none_name) in [
            (FilterCriterion::InvolvedDepartment, "No involved department"),
            (
                FilterCriterion::ResponsibilityDepartment,
                "No responsibility department",
            ),
        ] {
            if let Some(filter) = filters.id_list_mut(criterion) {
                filter.shortcut_options = my_department
                    .iter()
                    .map(|id| ShortcutOption::new(id.clone(), "My department"))
                    .chain(std::iter::once(ShortcutOption::new(NULL_OPTION_ID, none_name)))
                    .collect();
            }
        }
        for criterion in [FilterCriterion::Client, FilterCriterion::PrimaryClient] {
            if let Some(filter) = filters.id_list_mut(criterion) {
                filter.shortcut_options = vec![ShortcutOption::new(NULL_OPTION_ID, "No client")];
            }
        }
        if let Some(product_type) = filters.id_list_mut(FilterCriterion::ProductType) {
            product_type.options = options.product_types;
        }
        filters.first_workflow_estimated_time = MinMaxFilter {
            value: options.estimated_time,
            min_max_possible: MinMax::new(0.0, options.estimated_time.max),
        };
    }

    pub fn is_filters_dirty(&self) -> bool {
        self.filters.is_dirty()
    }

    /// Applies a batch of value changes. A value of the wrong kind is
    /// ignored with a warning.
    pub fn apply_filter_change(&mut self, changes: Vec<(FilterCriterion, FilterValue)>) {
        for (criterion, value) in changes {
            let kind = value.kind();
            if !self.filters.set_value(criterion, value) {
                log::warn!(
                    "filter {:?} does not accept a {:?} value, change ignored",
                    criterion,
                    kind
                );
            }
        }
    }

    /// Replaces the option list of an id-list criterion (search results)
    pub fn change_filter_options(&mut self, criterion: FilterCriterion, options: Vec<IdName>) {
        match self.filters.id_list_mut(criterion) {
            Some(filter) => filter.options = options,
            None => log::warn!("filter {:?} has no options", criterion),
        }
    }

    pub fn change_display_range(&mut self, change: DisplayRangeChange) {
        let show_completed = &mut self.filters.show_completed;
        if let Some(radio) = change.radio {
            show_completed.radio = radio;
        }
        if let Some(value) = change.value {
            show_completed.value = value;
        }
        if let Some(options) = change.options {
            show_completed.options = options;
        }
    }

    /// `false` (and nothing changes) if any given part equals the current one
    pub fn change_sort(&mut self, change: SortChange) -> bool {
        if change.order == Some(self.sort.order) || change.sort_by == Some(self.sort.sort_by) {
            return false;
        }
        if change.sort_by.is_none() && change.order.is_none() {
            return false;
        }
        if let Some(sort_by) = change.sort_by {
            self.sort.sort_by = sort_by;
        }
        if let Some(order) = change.order {
            self.sort.order = order;
        }
        true
    }

    /// `false` if the grouping is already active. Switching drops the
    /// drill-down filter.
    pub fn change_group_by(&mut self, group_by: GroupBy) -> bool {
        if self.group_by == group_by {
            return false;
        }
        self.group_by = group_by;
        self.additional_filter = None;
        true
    }

    /// Resets filter values to their defaults (`clearFilters`).
    ///
    /// With `only`, criteria outside the list keep their values and the
    /// search text is kept. The display range and "exclude unknown products"
    /// are never reset.
    pub fn reset_filters(&mut self, only: Option<&[FilterCriterion]>) {
        for criterion in FilterCriterion::ALL {
            if matches!(
                criterion,
                FilterCriterion::ShowCompleted | FilterCriterion::ExcludeUnknownProducts
            ) {
                continue;
            }
            if let Some(only) = only {
                if !only.contains(&criterion) || criterion == FilterCriterion::SearchQuery {
                    continue;
                }
            }
            self.filters.reset_value(criterion);
        }
    }

    /// Updates the visible criteria. If the toggled criterion was hidden while
    /// holding a value, every hidden criterion is reset; the returned flag
    /// tells the caller to refetch.
    pub fn select_filters(
        &mut self,
        values: Vec<FilterCriterion>,
        toggled: FilterCriterion,
    ) -> bool {
        let is_selected = values.contains(&toggled);
        let is_filter_changed = match toggled.kind() {
            FilterKind::IdList | FilterKind::DateRange | FilterKind::MinMax => {
                self.filters.has_value(toggled)
            }
            _ => false,
        };
        self.filter_selector = values;

        if is_selected || !is_filter_changed {
            return false;
        }
        let deselected: Vec<FilterCriterion> = SELECTABLE_FILTERS
            .into_iter()
            .filter(|criterion| !self.filter_selector.contains(criterion))
            .collect();
        self.reset_filters(Some(&deselected));
        true
    }

    /// Sets (or clears) the drill-down filter and resets every filter value
    pub fn set_additional_filter(&mut self, additional_filter: Option<IdName>) {
        self.additional_filter = additional_filter.filter(|f| !f.id.is_empty());
        self.reset_filters(None);
    }

    pub fn show_more_filter(&mut self, target: ShowMoreTarget<'_>) {
        self.set_additional_filter(Some(target.additional_filter()));
    }

    /// Next fetch starts from the first page
    pub fn reset_pagination_cursor(&mut self) {
        self.pagination.next = Some(0);
    }

    /// Stores pagination, issue counts and the grouping of a fresh response
    pub fn apply_list_response(
        &mut self,
        meta: &PaginationMeta,
        issues: ProductionIssuesSummary,
        custom_group_by: Option<GroupBy>,
    ) {
        if let Some(group_by) = custom_group_by {
            self.group_by = group_by;
        }
        self.issues = issues;
        self.pagination.total = meta.total;
        self.pagination.last_page = meta.last_page;
        self.pagination.current_page = meta.current_page;
        self.pagination.prev = meta.prev;
        self.pagination.next = meta.next;
    }
}

/// Create state signal
pub fn create_state(page_size: u64) -> RwSignal<ProductionFiltersState> {
    RwSignal::new(ProductionFiltersState::with_page_size(page_size))
}
