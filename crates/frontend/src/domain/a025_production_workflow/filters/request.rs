//! Сборка тела запроса списка из состояния фильтров и обратная гидратация
//! состояния из сохранённых пользовательских фильтров.

use contracts::domain::a025_production_workflow::request::{
    GetProductionWorkflowsFilteredRequest, LimitBy, LimitByKind, ProductionFilterPayload,
    ProductionSortParams, ShowCompletedParams, SkipTake,
};
use contracts::domain::a025_production_workflow::{FilterCriterion, GroupBy, ProductionIssue};
use contracts::shared::common::IdName;

use super::schema::{
    DateRangeFilter, FilterCriterionExt, FilterValue, IdListFilter, NULL_OPTION_ID, TO_STOCK_NO,
    TO_STOCK_YES,
};
use super::state::{ProductionFiltersState, SortState};
use crate::shared::date_utils::{end_of_day_iso, is_end_of_day, parse_iso, start_of_day_iso};

/// Payload slot of an id-list criterion whose ids may be `null`
fn nullable_ids_field(
    payload: &mut ProductionFilterPayload,
    criterion: FilterCriterion,
) -> Option<&mut Option<Vec<Option<String>>>> {
    let field = match criterion {
        FilterCriterion::Option => &mut payload.option,
        FilterCriterion::Client => &mut payload.client,
        FilterCriterion::OrderKey => &mut payload.order_key,
        FilterCriterion::CreatedBy => &mut payload.created_by,
        FilterCriterion::Vendor => &mut payload.vendor,
        FilterCriterion::Product => &mut payload.product,
        FilterCriterion::ProductionKey => &mut payload.production_key,
        FilterCriterion::TaskKey => &mut payload.task_key,
        FilterCriterion::Responsible => &mut payload.responsible,
        FilterCriterion::ProductType => &mut payload.product_type,
        FilterCriterion::PrimaryClient => &mut payload.primary_client,
        FilterCriterion::ExternalOrderNumber => &mut payload.external_order_number,
        FilterCriterion::MarketplaceOrderNumber => &mut payload.marketplace_order_number,
        FilterCriterion::InvolvedDepartment => &mut payload.involved_department,
        FilterCriterion::WorkflowName => &mut payload.workflow_template_name,
        FilterCriterion::ResponsibilityDepartment => &mut payload.responsibility_department,
        FilterCriterion::ConfigurationName => &mut payload.product_configuration_name,
        FilterCriterion::UsersAssignedToProductionTasks => {
            &mut payload.users_assigned_to_production_tasks
        }
        _ => return None,
    };
    Some(field)
}

/// Payload slot of an enum-valued criterion (plain string ids)
fn plain_ids_field(
    payload: &mut ProductionFilterPayload,
    criterion: FilterCriterion,
) -> Option<&mut Option<Vec<String>>> {
    let field = match criterion {
        FilterCriterion::OrderPriority => &mut payload.order_priority,
        FilterCriterion::ProductionStatus => &mut payload.production_status,
        FilterCriterion::ProductionPriority => &mut payload.production_priority,
        FilterCriterion::Issues => &mut payload.issues,
        _ => return None,
    };
    Some(field)
}

fn date_field(
    payload: &mut ProductionFilterPayload,
    criterion: FilterCriterion,
) -> Option<&mut Option<Vec<String>>> {
    let field = match criterion {
        FilterCriterion::CreatedDate => &mut payload.created_at,
        FilterCriterion::StartedDate => &mut payload.started_at,
        FilterCriterion::DeadlineDate => &mut payload.deadline_at,
        FilterCriterion::CompletedDate => &mut payload.completed_at,
        _ => return None,
    };
    Some(field)
}

fn nullable_ids(values: &[IdName]) -> Option<Vec<Option<String>>> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|value| (value.id != NULL_OPTION_ID).then(|| value.id.clone()))
            .collect(),
    )
}

fn plain_ids(values: &[IdName]) -> Option<Vec<String>> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|value| value.id.clone()).collect())
}

/// `[startOfDay, endOfDay]` without the missing bounds
fn date_bounds(range: DateRangeFilter) -> Option<Vec<String>> {
    let bounds: Vec<String> = range
        .from
        .map(start_of_day_iso)
        .into_iter()
        .chain(range.to.map(end_of_day_iso))
        .collect();
    (!bounds.is_empty()).then_some(bounds)
}

/// Yes -> true, No -> false, both or none -> not sent
fn to_stock_flag(values: &[IdName]) -> Option<bool> {
    let yes = values.iter().any(|value| value.name == TO_STOCK_YES);
    let no = values.iter().any(|value| value.name == TO_STOCK_NO);
    match (yes, no) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

fn limit_by_from(additional_filter: &IdName) -> LimitBy {
    let by = if additional_filter.name.contains("Order") {
        LimitByKind::OrderKey
    } else {
        LimitByKind::ProductId
    };
    LimitBy {
        by,
        value: additional_filter.id.clone(),
    }
}

/// Compiles the current state into the body of `/production-workflows/all`.
///
/// `reset_skip_preserve_take` re-reads everything loaded so far from the
/// first row (`skip = 0, take = next`) instead of requesting the next page.
pub fn prepare_request_body(
    state: &ProductionFiltersState,
    custom_group_by: Option<GroupBy>,
    reset_skip_preserve_take: bool,
) -> GetProductionWorkflowsFilteredRequest {
    let filters = &state.filters;
    let mut payload = ProductionFilterPayload::default();

    for criterion in FilterCriterion::ALL {
        if let Some(field) = nullable_ids_field(&mut payload, criterion) {
            *field = nullable_ids(filters.ids(criterion));
        } else if let Some(field) = plain_ids_field(&mut payload, criterion) {
            *field = plain_ids(filters.ids(criterion));
        } else if let Some(field) = date_field(&mut payload, criterion) {
            *field = date_bounds(filters.date_range(criterion));
        }
    }

    if state.filter_with_all_issues {
        payload.issues = Some(
            ProductionIssue::ALL
                .iter()
                .map(|issue| issue.as_str().to_string())
                .collect(),
        );
    }
    payload.to_stock = to_stock_flag(filters.ids(FilterCriterion::MakeToStock));
    payload.source = match filters.ids(FilterCriterion::Source) {
        [single] => Some(single.id.clone()),
        _ => None,
    };

    let search_query = filters.search_query.trim();
    payload.search_query = (!search_query.is_empty()).then(|| search_query.to_string());

    let estimated = filters.first_workflow_estimated_time;
    payload.first_workflow_estimated_time = (!estimated.is_default()).then_some(estimated.value);

    payload.limit_by = state
        .additional_filter
        .as_ref()
        .map(limit_by_from)
        .or_else(|| filters.limit_by.clone());
    payload.show_completed = Some(ShowCompletedParams {
        kind: filters.show_completed.radio,
        period: filters.show_completed.period_days(),
    });
    payload.exclude_unknown_products = Some(filters.exclude_unknown_products);

    let pagination = &state.pagination;
    let (skip, take) = if reset_skip_preserve_take {
        let loaded = pagination.next.unwrap_or(pagination.total);
        (0, loaded.max(pagination.per_page))
    } else {
        (pagination.next.unwrap_or(0), pagination.per_page)
    };

    GetProductionWorkflowsFilteredRequest {
        chosen_filters: Some(state.filter_selector.clone()),
        filters: payload,
        sort: ProductionSortParams {
            sort_by: state.sort.sort_by,
            order: state.sort.order,
        },
        group_by: custom_group_by.unwrap_or(state.group_by),
        show_parent_items_if_subitems_match_filters: Some(
            filters.show_parent_items_if_sub_items_match_filters,
        ),
        show_all_subitems: Some(filters.show_all_sub_items),
        pagination: Some(SkipTake { skip, take }),
    }
}

/// Maps persisted ids back to option objects. Ids that are not among the
/// loaded options are kept as `{id, name: id}`.
fn resolve_ids(criterion: FilterCriterion, filter: &IdListFilter, ids: Vec<String>) -> Vec<IdName> {
    ids.into_iter()
        .map(|id| {
            filter.find_option(&id).unwrap_or_else(|| {
                log::warn!("saved filter {:?} refers to unknown option {}", criterion, id);
                IdName::new(id.clone(), id)
            })
        })
        .collect()
}

fn date_range_from(bounds: &[String]) -> DateRangeFilter {
    let parsed: Vec<_> = bounds.iter().filter_map(|value| parse_iso(value)).collect();
    match parsed.as_slice() {
        [from, to, ..] => DateRangeFilter::new(Some(from.date_naive()), Some(to.date_naive())),
        [single] if is_end_of_day(single) => DateRangeFilter::new(None, Some(single.date_naive())),
        [single] => DateRangeFilter::new(Some(single.date_naive()), None),
        [] => DateRangeFilter::default(),
    }
}

/// Hydrates the state from the saved user filters document.
///
/// Must run after [`ProductionFiltersState::load_defaults`], since ids are
/// resolved against the loaded options. Keys missing from the document keep
/// the in-memory value; the two show flags fall back to `true`.
pub fn set_user_filters(
    state: &mut ProductionFiltersState,
    persisted: &GetProductionWorkflowsFilteredRequest,
) {
    state.group_by = persisted.group_by;
    state.sort = SortState {
        sort_by: persisted.sort.sort_by,
        order: persisted.sort.order,
    };
    if let Some(chosen) = &persisted.chosen_filters {
        state.filter_selector = chosen
            .iter()
            .copied()
            .filter(|criterion| criterion.is_selectable())
            .collect();
    }

    let mut payload = persisted.filters.clone();
    let filters = &mut state.filters;

    for criterion in FilterCriterion::ALL {
        let ids: Option<Vec<String>> = if let Some(field) = nullable_ids_field(&mut payload, criterion)
        {
            field.take().map(|ids| {
                ids.into_iter()
                    .map(|id| id.unwrap_or_else(|| NULL_OPTION_ID.to_string()))
                    .collect()
            })
        } else if let Some(field) = plain_ids_field(&mut payload, criterion) {
            field.take()
        } else if let Some(field) = date_field(&mut payload, criterion) {
            if let Some(bounds) = field.take() {
                filters.set_value(criterion, FilterValue::DateRange(date_range_from(&bounds)));
            }
            None
        } else {
            None
        };

        if let (Some(ids), Some(filter)) = (ids, filters.id_list_mut(criterion)) {
            filter.value = resolve_ids(criterion, filter, ids);
        }
    }

    if let Some(filter) = filters.id_list_mut(FilterCriterion::MakeToStock) {
        let name = match payload.to_stock {
            Some(true) => Some(TO_STOCK_YES),
            Some(false) => Some(TO_STOCK_NO),
            None => None,
        };
        filter.value = name
            .and_then(|name| filter.options.iter().find(|option| option.name == name))
            .cloned()
            .into_iter()
            .collect();
    }
    if let Some(source) = payload.source.take() {
        if let Some(filter) = filters.id_list_mut(FilterCriterion::Source) {
            filter.value = resolve_ids(FilterCriterion::Source, filter, vec![source]);
        }
    }

    if let Some(search_query) = payload.search_query.take() {
        filters.search_query = search_query;
    }
    if let Some(estimated) = payload.first_workflow_estimated_time {
        filters.first_workflow_estimated_time.value = estimated;
    }
    if let Some(limit_by) = payload.limit_by.take() {
        filters.limit_by = Some(limit_by);
    }
    if let Some(show_completed) = payload.show_completed {
        let show = &mut filters.show_completed;
        show.radio = show_completed.kind;
        let period = show_completed.period.map(|days| days.to_string());
        show.value = show
            .options
            .iter()
            .find(|option| Some(&option.id) == period.as_ref())
            .or_else(|| show.options.first())
            .cloned()
            .unwrap_or_else(|| show.value.clone());
    }
    if let Some(exclude) = payload.exclude_unknown_products {
        filters.exclude_unknown_products = exclude;
    }

    filters.show_all_sub_items = persisted.show_all_subitems.unwrap_or(true);
    filters.show_parent_items_if_sub_items_match_filters = persisted
        .show_parent_items_if_subitems_match_filters
        .unwrap_or(true);
}
