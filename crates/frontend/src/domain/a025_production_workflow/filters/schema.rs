//! Описание критериев фильтрации производств и их значений по умолчанию

use chrono::NaiveDate;
use contracts::domain::a025_production_workflow::request::LimitBy;
use contracts::domain::a025_production_workflow::{
    FilterCriterion, Priority, ProductionIssue, ProductionSource, ProductionStatus,
    ShowCompletedPeriod,
};
use contracts::shared::common::{IdName, MinMax};
use std::collections::BTreeMap;

/// Option id standing for "value is not set" ("No vendor", "No client", ...).
/// Sent to the backend as JSON `null`.
pub const NULL_OPTION_ID: &str = "null";
pub const NO_ISSUES_OPTION_ID: &str = "no_issues";
pub const TO_STOCK_YES: &str = "Yes";
pub const TO_STOCK_NO: &str = "No";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    IdList,
    DateRange,
    MinMax,
    Text,
    Toggle,
    DisplayRange,
    LimitBy,
}

/// Criteria the user can show or hide in the filter bar, in menu order
pub const SELECTABLE_FILTERS: [FilterCriterion; 29] = [
    FilterCriterion::ResponsibilityDepartment,
    FilterCriterion::InvolvedDepartment,
    FilterCriterion::FirstWorkflowEstimatedTime,
    FilterCriterion::ProductType,
    FilterCriterion::CreatedDate,
    FilterCriterion::StartedDate,
    FilterCriterion::DeadlineDate,
    FilterCriterion::CompletedDate,
    FilterCriterion::Vendor,
    FilterCriterion::ProductionStatus,
    FilterCriterion::ProductionKey,
    FilterCriterion::ExternalOrderNumber,
    FilterCriterion::Responsible,
    FilterCriterion::CreatedBy,
    FilterCriterion::OrderPriority,
    FilterCriterion::MakeToStock,
    FilterCriterion::ProductionPriority,
    FilterCriterion::Option,
    FilterCriterion::UsersAssignedToProductionTasks,
    FilterCriterion::OrderKey,
    FilterCriterion::Issues,
    FilterCriterion::Source,
    FilterCriterion::Client,
    FilterCriterion::Product,
    FilterCriterion::TaskKey,
    FilterCriterion::MarketplaceOrderNumber,
    FilterCriterion::PrimaryClient,
    FilterCriterion::ConfigurationName,
    FilterCriterion::WorkflowName,
];

pub const DEFAULT_SELECTED_FILTERS: [FilterCriterion; 2] = [
    FilterCriterion::ResponsibilityDepartment,
    FilterCriterion::FirstWorkflowEstimatedTime,
];

pub trait FilterCriterionExt {
    fn kind(self) -> FilterKind;
    fn title(self) -> &'static str;
    fn is_selectable(self) -> bool;
}

impl FilterCriterionExt for FilterCriterion {
    fn kind(self) -> FilterKind {
        match self {
            FilterCriterion::CreatedDate
            | FilterCriterion::StartedDate
            | FilterCriterion::DeadlineDate
            | FilterCriterion::CompletedDate => FilterKind::DateRange,
            FilterCriterion::FirstWorkflowEstimatedTime => FilterKind::MinMax,
            FilterCriterion::SearchQuery => FilterKind::Text,
            FilterCriterion::ExcludeUnknownProducts
            | FilterCriterion::ShowAllSubItems
            | FilterCriterion::ShowParentIfSubItemsMatchFilters => FilterKind::Toggle,
            FilterCriterion::ShowCompleted => FilterKind::DisplayRange,
            FilterCriterion::LimitBy => FilterKind::LimitBy,
            _ => FilterKind::IdList,
        }
    }

    fn title(self) -> &'static str {
        match self {
            FilterCriterion::Client => "Client",
            FilterCriterion::Vendor => "Vendor",
            FilterCriterion::Issues => "Issues",
            FilterCriterion::Source => "Source",
            FilterCriterion::Option => "Options",
            FilterCriterion::Product => "Product",
            FilterCriterion::LimitBy => "Limit by",
            FilterCriterion::TaskKey => "Task key",
            FilterCriterion::OrderKey => "Order key",
            FilterCriterion::MakeToStock => "Make to stock",
            FilterCriterion::CreatedBy => "Created by",
            FilterCriterion::CreatedDate => "Created date",
            FilterCriterion::StartedDate => "Started date",
            FilterCriterion::Responsible => "Responsible",
            FilterCriterion::DeadlineDate => "Deadline",
            FilterCriterion::ProductType => "Product type",
            FilterCriterion::SearchQuery => "Search",
            FilterCriterion::CompletedDate => "Completion date",
            FilterCriterion::PrimaryClient => "Primary client",
            FilterCriterion::OrderPriority => "Order priority",
            FilterCriterion::ProductionKey => "Production key",
            FilterCriterion::ShowCompleted => "Display range",
            FilterCriterion::ShowAllSubItems => "Show all sub items",
            FilterCriterion::ProductionStatus => "Production status",
            FilterCriterion::WorkflowName => "Workflow name",
            FilterCriterion::InvolvedDepartment => "Involved Department",
            FilterCriterion::ProductionPriority => "Production priority",
            FilterCriterion::ExternalOrderNumber => "External order number",
            FilterCriterion::ConfigurationName => "Configuration name",
            FilterCriterion::MarketplaceOrderNumber => "Marketplace order number",
            FilterCriterion::ExcludeUnknownProducts => "Exclude unknown products",
            FilterCriterion::ResponsibilityDepartment => "Responsibility Department",
            FilterCriterion::FirstWorkflowEstimatedTime => "Estimated time",
            FilterCriterion::UsersAssignedToProductionTasks => "Users assigned",
            FilterCriterion::ShowParentIfSubItemsMatchFilters => {
                "Show parent items if sub items match filters"
            }
        }
    }

    fn is_selectable(self) -> bool {
        SELECTABLE_FILTERS.contains(&self)
    }
}

/// Быстрый выбор над списком опций ("Me", "No responsible", ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutOption {
    pub id: String,
    pub name: String,
    /// Text shown in the picker instead of the name
    pub value: Option<String>,
}

impl ShortcutOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdListFilter {
    pub value: Vec<IdName>,
    pub options: Vec<IdName>,
    /// Options offered on top of the loaded ones (`null` id entries)
    pub additional_options: Vec<IdName>,
    pub shortcut_options: Vec<ShortcutOption>,
}

impl IdListFilter {
    fn with_options(options: Vec<IdName>) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    fn with_additional(additional_options: Vec<IdName>) -> Self {
        Self {
            additional_options,
            ..Default::default()
        }
    }

    /// Looks the id up in options, additional and shortcut options
    pub fn find_option(&self, id: &str) -> Option<IdName> {
        self.options
            .iter()
            .chain(&self.additional_options)
            .find(|option| option.id == id)
            .cloned()
            .or_else(|| {
                self.shortcut_options
                    .iter()
                    .find(|option| option.id == id)
                    .map(|option| IdName::new(option.id.clone(), option.name.clone()))
            })
    }
}

/// Диапазон дат фильтра (границы включительно, целыми днями)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeFilter {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MinMaxFilter {
    pub value: MinMax,
    /// Bounds reported by the server; a value equal to them means "not set"
    pub min_max_possible: MinMax,
}

impl MinMaxFilter {
    pub fn is_default(&self) -> bool {
        self.value == self.min_max_possible
    }
}

/// "Показывать завершённые": режим и период в днях
#[derive(Debug, Clone, PartialEq)]
pub struct ShowCompletedFilter {
    pub radio: ShowCompletedPeriod,
    pub value: IdName,
    pub options: Vec<IdName>,
}

impl ShowCompletedFilter {
    /// Period in days, only meaningful for `ShowCompletedPeriod::Some`
    pub fn period_days(&self) -> Option<u32> {
        match self.radio {
            ShowCompletedPeriod::Some => self.value.id.parse().ok(),
            _ => None,
        }
    }
}

impl Default for ShowCompletedFilter {
    fn default() -> Self {
        let options = vec![
            IdName::new("1", "1 day"),
            IdName::new("3", "3 days"),
            IdName::new("7", "7 days"),
            IdName::new("30", "30 days"),
            IdName::new("90", "90 days"),
        ];
        Self {
            radio: ShowCompletedPeriod::Some,
            value: options[0].clone(),
            options,
        }
    }
}

/// New value for a single criterion
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Ids(Vec<IdName>),
    DateRange(DateRangeFilter),
    MinMax(MinMax),
    Text(String),
    Toggle(bool),
    LimitBy(Option<LimitBy>),
}

impl FilterValue {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterValue::Ids(_) => FilterKind::IdList,
            FilterValue::DateRange(_) => FilterKind::DateRange,
            FilterValue::MinMax(_) => FilterKind::MinMax,
            FilterValue::Text(_) => FilterKind::Text,
            FilterValue::Toggle(_) => FilterKind::Toggle,
            FilterValue::LimitBy(_) => FilterKind::LimitBy,
        }
    }
}

/// One typed entry per criterion
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionFilters {
    id_lists: BTreeMap<FilterCriterion, IdListFilter>,
    date_ranges: BTreeMap<FilterCriterion, DateRangeFilter>,
    pub first_workflow_estimated_time: MinMaxFilter,
    pub search_query: String,
    pub show_completed: ShowCompletedFilter,
    pub limit_by: Option<LimitBy>,
    pub exclude_unknown_products: bool,
    pub show_all_sub_items: bool,
    pub show_parent_items_if_sub_items_match_filters: bool,
}

fn priority_options() -> Vec<IdName> {
    Priority::ALL
        .iter()
        .map(|p| IdName::new(p.as_str(), p.as_str()))
        .collect()
}

impl Default for ProductionFilters {
    fn default() -> Self {
        let mut id_lists = BTreeMap::new();
        let mut date_ranges = BTreeMap::new();
        for criterion in FilterCriterion::ALL {
            match criterion.kind() {
                FilterKind::IdList => {
                    id_lists.insert(criterion, IdListFilter::default());
                }
                FilterKind::DateRange => {
                    date_ranges.insert(criterion, DateRangeFilter::default());
                }
                _ => {}
            }
        }

        id_lists.insert(
            FilterCriterion::MakeToStock,
            IdListFilter::with_options(vec![
                IdName::new("1", TO_STOCK_YES),
                IdName::new("2", TO_STOCK_NO),
            ]),
        );
        id_lists.insert(
            FilterCriterion::Issues,
            IdListFilter {
                options: ProductionIssue::ALL
                    .iter()
                    .map(|issue| IdName::new(issue.as_str(), issue.title()))
                    .collect(),
                additional_options: vec![IdName::new(NO_ISSUES_OPTION_ID, "No issues")],
                ..Default::default()
            },
        );
        id_lists.insert(
            FilterCriterion::OrderPriority,
            IdListFilter::with_options(priority_options()),
        );
        id_lists.insert(
            FilterCriterion::ProductionPriority,
            IdListFilter::with_options(priority_options()),
        );
        id_lists.insert(
            FilterCriterion::ProductionStatus,
            IdListFilter::with_options(
                ProductionStatus::ALL
                    .iter()
                    .map(|status| IdName::new(status.as_str(), status.title()))
                    .collect(),
            ),
        );
        id_lists.insert(
            FilterCriterion::Source,
            IdListFilter::with_options(
                [ProductionSource::Manual, ProductionSource::External]
                    .iter()
                    .map(|source| IdName::new(source.as_str(), source.as_str()))
                    .collect(),
            ),
        );
        id_lists.insert(
            FilterCriterion::ProductType,
            IdListFilter::with_additional(vec![IdName::new(NULL_OPTION_ID, "No type")]),
        );
        id_lists.insert(
            FilterCriterion::Vendor,
            IdListFilter::with_additional(vec![IdName::new(NULL_OPTION_ID, "No vendor")]),
        );

        Self {
            id_lists,
            date_ranges,
            first_workflow_estimated_time: MinMaxFilter::default(),
            search_query: String::new(),
            show_completed: ShowCompletedFilter::default(),
            limit_by: None,
            exclude_unknown_products: false,
            show_all_sub_items: true,
            show_parent_items_if_sub_items_match_filters: false,
        }
    }
}

impl ProductionFilters {
    pub fn id_list(&self, criterion: FilterCriterion) -> Option<&IdListFilter> {
        self.id_lists.get(&criterion)
    }

    pub fn id_list_mut(&mut self, criterion: FilterCriterion) -> Option<&mut IdListFilter> {
        self.id_lists.get_mut(&criterion)
    }

    /// Selected options of an id-list criterion, empty for other kinds
    pub fn ids(&self, criterion: FilterCriterion) -> &[IdName] {
        self.id_lists
            .get(&criterion)
            .map(|filter| filter.value.as_slice())
            .unwrap_or(&[])
    }

    pub fn date_range(&self, criterion: FilterCriterion) -> DateRangeFilter {
        self.date_ranges
            .get(&criterion)
            .copied()
            .unwrap_or_default()
    }

    /// Sets the value of one criterion. `false` if the value does not fit
    /// the criterion kind; nothing is changed then.
    pub fn set_value(&mut self, criterion: FilterCriterion, value: FilterValue) -> bool {
        match (criterion.kind(), value) {
            (FilterKind::IdList, FilterValue::Ids(ids)) => match self.id_lists.get_mut(&criterion) {
                Some(filter) => {
                    filter.value = ids;
                    true
                }
                None => false,
            },
            (FilterKind::DateRange, FilterValue::DateRange(range)) => {
                self.date_ranges.insert(criterion, range);
                true
            }
            (FilterKind::MinMax, FilterValue::MinMax(value)) => {
                self.first_workflow_estimated_time.value = value;
                true
            }
            (FilterKind::Text, FilterValue::Text(text)) => {
                self.search_query = text;
                true
            }
            (FilterKind::Toggle, FilterValue::Toggle(flag)) => {
                match criterion {
                    FilterCriterion::ExcludeUnknownProducts => self.exclude_unknown_products = flag,
                    FilterCriterion::ShowAllSubItems => self.show_all_sub_items = flag,
                    _ => self.show_parent_items_if_sub_items_match_filters = flag,
                }
                true
            }
            (FilterKind::LimitBy, FilterValue::LimitBy(limit_by)) => {
                self.limit_by = limit_by;
                true
            }
            _ => false,
        }
    }

    /// Puts the default value back; options are kept. The estimated time
    /// goes back to `{0, max possible}`.
    pub fn reset_value(&mut self, criterion: FilterCriterion) {
        let defaults = ProductionFilters::default();
        match criterion.kind() {
            FilterKind::IdList => {
                if let Some(filter) = self.id_lists.get_mut(&criterion) {
                    filter.value.clear();
                }
            }
            FilterKind::DateRange => {
                self.date_ranges.insert(criterion, DateRangeFilter::default());
            }
            FilterKind::MinMax => {
                let possible = self.first_workflow_estimated_time.min_max_possible;
                self.first_workflow_estimated_time.value = MinMax::new(0.0, possible.max);
            }
            FilterKind::Text => self.search_query.clear(),
            FilterKind::Toggle => match criterion {
                FilterCriterion::ExcludeUnknownProducts => {
                    self.exclude_unknown_products = defaults.exclude_unknown_products
                }
                FilterCriterion::ShowAllSubItems => {
                    self.show_all_sub_items = defaults.show_all_sub_items
                }
                _ => {
                    self.show_parent_items_if_sub_items_match_filters =
                        defaults.show_parent_items_if_sub_items_match_filters
                }
            },
            FilterKind::DisplayRange => self.show_completed = defaults.show_completed,
            FilterKind::LimitBy => self.limit_by = None,
        }
    }

    /// Whether the criterion holds something other than its default value
    pub fn has_value(&self, criterion: FilterCriterion) -> bool {
        let defaults = ProductionFilters::default();
        match criterion.kind() {
            FilterKind::IdList => !self.ids(criterion).is_empty(),
            FilterKind::DateRange => self.date_range(criterion).is_set(),
            FilterKind::MinMax => !self.first_workflow_estimated_time.is_default(),
            FilterKind::Text => !self.search_query.is_empty(),
            FilterKind::Toggle => match criterion {
                FilterCriterion::ExcludeUnknownProducts => {
                    self.exclude_unknown_products != defaults.exclude_unknown_products
                }
                FilterCriterion::ShowAllSubItems => {
                    self.show_all_sub_items != defaults.show_all_sub_items
                }
                _ => {
                    self.show_parent_items_if_sub_items_match_filters
                        != defaults.show_parent_items_if_sub_items_match_filters
                }
            },
            FilterKind::DisplayRange => self.show_completed != defaults.show_completed,
            FilterKind::LimitBy => self.limit_by.is_some(),
        }
    }

    /// Any value filter is set. Display range, toggles and the drill-down
    /// limit are view settings and never make the filters dirty.
    pub fn is_dirty(&self) -> bool {
        FilterCriterion::ALL.into_iter().any(|criterion| {
            matches!(
                criterion.kind(),
                FilterKind::IdList | FilterKind::DateRange | FilterKind::MinMax | FilterKind::Text
            ) && self.has_value(criterion)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_criterion_has_a_kind_and_title() {
        let filters = ProductionFilters::default();
        for criterion in FilterCriterion::ALL {
            assert!(!criterion.title().is_empty());
            if criterion.kind() == FilterKind::IdList {
                assert!(filters.id_list(criterion).is_some(), "{:?}", criterion);
            }
        }
        assert_eq!(SELECTABLE_FILTERS.iter().filter(|c| c.is_selectable()).count(), 29);
        assert!(!FilterCriterion::SearchQuery.is_selectable());
    }

    #[test]
    fn test_static_defaults() {
        let filters = ProductionFilters::default();
        let to_stock = filters.id_list(FilterCriterion::MakeToStock).unwrap();
        assert_eq!(to_stock.options[0], IdName::new("1", "Yes"));
        assert_eq!(
            filters.id_list(FilterCriterion::Vendor).unwrap().find_option(NULL_OPTION_ID),
            Some(IdName::new("null", "No vendor"))
        );
        assert_eq!(filters.id_list(FilterCriterion::Issues).unwrap().options.len(), 5);
        assert_eq!(filters.show_completed.period_days(), Some(1));
        assert!(filters.show_all_sub_items);
        assert!(!filters.show_parent_items_if_sub_items_match_filters);
        assert!(!filters.is_dirty());
    }

    #[test]
    fn test_set_value_checks_kind() {
        let mut filters = ProductionFilters::default();
        assert!(!filters.set_value(FilterCriterion::Client, FilterValue::Text("x".into())));
        assert!(filters.set_value(
            FilterCriterion::Client,
            FilterValue::Ids(vec![IdName::new("c1", "ACME")])
        ));
        assert_eq!(filters.ids(FilterCriterion::Client).len(), 1);
        assert!(filters.is_dirty());
    }

    #[test]
    fn test_toggles_do_not_make_filters_dirty() {
        let mut filters = ProductionFilters::default();
        filters.set_value(FilterCriterion::ShowAllSubItems, FilterValue::Toggle(false));
        filters.exclude_unknown_products = true;
        assert!(filters.has_value(FilterCriterion::ShowAllSubItems));
        assert!(!filters.is_dirty());
    }

    #[test]
    fn test_reset_estimated_time_uses_possible_max() {
        let mut filters = ProductionFilters::default();
        filters.first_workflow_estimated_time = MinMaxFilter {
            value: MinMax::new(10.0, 50.0),
            min_max_possible: MinMax::new(0.0, 120.0),
        };
        filters.reset_value(FilterCriterion::FirstWorkflowEstimatedTime);
        assert_eq!(filters.first_workflow_estimated_time.value, MinMax::new(0.0, 120.0));
        assert!(!filters.is_dirty());
    }
}
