pub mod controller;
pub mod selection;
pub mod state;

use self::controller::{ProductionController, ResponsibleChoice};
use self::state::VisibleRow;
use crate::domain::a025_production_workflow::api::{HttpProductionApi, ProductionApi};
use crate::domain::a025_production_workflow::filters::schema::FilterCriterionExt;
use crate::domain::a025_production_workflow::filters::state::{ProductionFiltersState, SortChange};
use crate::domain::a025_production_workflow::issues::get_production_issues;
use crate::shared::config::ClientConfig;
use crate::shared::notify::{NotificationKind, Notifier, SignalNotifier};
use contracts::domain::a025_production_workflow::live::LiveEvent;
use contracts::domain::a025_production_workflow::{GroupBy, ProductionSortBy};
use futures::future::LocalBoxFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;
use thaw::*;

type PageController = ProductionController<HttpProductionApi, SignalNotifier>;
type Job = fn(PageController) -> LocalBoxFuture<'static, ()>;

/// Точка входа live-канала: одно сообщение websocket за вызов
pub fn handle_live_message<A, N>(controller: &ProductionController<A, N>, text: &str)
where
    A: ProductionApi + 'static,
    N: Notifier + 'static,
{
    match LiveEvent::parse(text) {
        Ok(event) => controller.handle_live_event(event),
        Err(e) => log::warn!("unrecognized live message: {}", e),
    }
}

fn notification_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "alert alert--success",
        NotificationKind::Error => "alert alert--error",
        NotificationKind::Info => "alert alert--info",
    }
}

#[component]
#[allow(non_snake_case)]
pub fn ProductionListPage() -> impl IntoView {
    let config = ClientConfig::default();
    let notifier = SignalNotifier::new();
    let api = HttpProductionApi::new(config.api_base());
    let controller: PageController =
        ProductionController::new(Arc::new(api), Arc::new(notifier), config);
    let filters = controller.filters;
    let list = controller.list;
    let ctrl = StoredValue::new(controller);

    // Загрузка при монтировании
    Effect::new(move |_| {
        let c = ctrl.get_value();
        spawn_local(async move { c.init_page_data().await });
    });

    on_cleanup(move || {
        ctrl.try_with_value(|c| c.clear_filter_state());
    });

    let run = move |job: Job| spawn_local(job(ctrl.get_value()));

    let group_by_buttons = [
        (GroupBy::None, "Без группировки"),
        (GroupBy::Order, "По заказам"),
        (GroupBy::Product, "По продуктам"),
    ]
    .into_iter()
    .map(|(group_by, label)| {
        view! {
            <Button
                appearance=Signal::derive(move || {
                    if filters.with(|s| s.group_by == group_by) {
                        ButtonAppearance::Primary
                    } else {
                        ButtonAppearance::Secondary
                    }
                })
                on_click=move |_| {
                    let c = ctrl.get_value();
                    spawn_local(async move { c.on_group_by_change(group_by).await });
                }
            >
                {label}
            </Button>
        }
    })
    .collect_view();

    let sort_by_deadline = move |_| {
        let c = ctrl.get_value();
        spawn_local(async move {
            c.on_change_sort(SortChange {
                sort_by: Some(ProductionSortBy::DeadlineAt),
                order: None,
            })
            .await
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Производство"</h1>
                    <span class="badge">
                        {move || filters.with(|s| s.pagination.total.to_string())}
                    </span>
                </div>

                <div class="page__header-right">
                    <Flex gap=FlexGap::Small>
                        <input
                            type="search"
                            class="search-input"
                            placeholder="Поиск..."
                            on:input=move |ev| {
                                let text = event_target_value(&ev);
                                let c = ctrl.get_value();
                                spawn_local(async move { c.on_search_query_change(text).await });
                            }
                        />
                        {group_by_buttons}
                        <Button appearance=ButtonAppearance::Subtle on_click=sort_by_deadline>
                            "Срок"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            disabled=Signal::derive(move || !filters.with(|s| s.is_filters_dirty()))
                            on_click=move |_| run(|c| Box::pin(async move { c.clear_filters().await }))
                        >
                            "Сбросить фильтры"
                        </Button>
                    </Flex>
                </div>
            </div>

            <div class="page__toolbar">
                <Flex gap=FlexGap::Small>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            let enabled = list.with_untracked(|s| s.selection.is_enable_multi_actions);
                            ctrl.with_value(|c| c.toggle_multi_actions(!enabled));
                        }
                    >
                        "Выбрать"
                    </Button>
                    <Show when=move || list.with(|s| s.selection.is_enable_multi_actions)>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| ctrl.with_value(|c| c.select_or_deselect_all(false))
                        >
                            "Выбрать все"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || !list.with(|s| s.is_mass_launch_possible()))
                            on_click=move |_| run(|c| Box::pin(async move { c.launch_selected().await }))
                        >
                            "Запустить"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| run(|c| Box::pin(async move {
                                c.assign_responsible_to_selected(ResponsibleChoice::Unassigned).await
                            }))
                        >
                            "Снять ответственного"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            disabled=Signal::derive(move || !list.with(|s| s.is_delete_enabled()))
                            on_click=move |_| run(|c| Box::pin(async move { c.delete_selected().await }))
                        >
                            "Удалить"
                        </Button>
                    </Show>
                </Flex>

                <Show when=move || list.with(|s| s.launching_progress.visible)>
                    <div class="launching-progress">
                        "Запуск: "
                        {move || list.with(|s| s.launching_progress.count)}
                    </div>
                </Show>
            </div>

            <div class="filter-selector">
                {ProductionFiltersState::filter_selector_options()
                    .iter()
                    .copied()
                    .map(|criterion| {
                        view! {
                            <label class="filter-selector__item">
                                <input
                                    type="checkbox"
                                    prop:checked=move || filters.with(|s| s.filter_selector.contains(&criterion))
                                    on:change=move |_| {
                                        let mut values = filters.with_untracked(|s| s.filter_selector.clone());
                                        if values.contains(&criterion) {
                                            values.retain(|v| *v != criterion);
                                        } else {
                                            values.push(criterion);
                                        }
                                        let c = ctrl.get_value();
                                        spawn_local(async move { c.on_select_filters(values, criterion).await });
                                    }
                                />
                                {criterion.title()}
                            </label>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="notifications">
                {move || {
                    notifier
                        .items
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| {
                            view! {
                                <div
                                    class=notification_class(item.kind)
                                    on:click=move |_| notifier.dismiss(index)
                                >
                                    {item.message}
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <Show when=move || filters.with(|s| s.is_fetching_data)>
                <Spinner />
            </Show>

            <div class="table-wrapper">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>""</TableHeaderCell>
                            <TableHeaderCell>"Производство"</TableHeaderCell>
                            <TableHeaderCell>"Ключ"</TableHeaderCell>
                            <TableHeaderCell>"Статус"</TableHeaderCell>
                            <TableHeaderCell>"Приоритет"</TableHeaderCell>
                            <TableHeaderCell>"Ответственный"</TableHeaderCell>
                            <TableHeaderCell>"Проблемы"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || list.with(|s| s.visible_rows())
                            key=|row| (row.production.id.clone(), row.depth, Arc::as_ptr(&row.production) as usize)
                            children=move |row: VisibleRow| {
                                let production = row.production.clone();
                                let id = production.id.clone();
                                let id_for_open = id.clone();
                                let id_for_check = id.clone();
                                let id_for_status = id.clone();
                                let id_for_assigning = id.clone();
                                let root_id = (row.depth > 0).then(|| row.root_id.clone());
                                let has_nested = production.has_nested();
                                let responsible = production
                                    .responsible
                                    .as_ref()
                                    .map(|r| format!("{} {}", r.first_name, r.last_name))
                                    .unwrap_or_default();
                                let indent = format!("padding-left: {}px;", row.depth * 20);
                                let issues = get_production_issues(&production, chrono::Utc::now())
                                    .into_iter()
                                    .map(|issue| issue.name)
                                    .collect::<Vec<_>>()
                                    .join(", ");

                                let production_for_select = production.clone();
                                let title = production.title.clone();
                                let production_key = production.production_key.clone();
                                let status = production.status;
                                let priority = production.priority.as_str();

                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <Show when=move || list.with(|s| s.selection.is_enable_multi_actions)>
                                                <input
                                                    type="checkbox"
                                                    prop:checked={
                                                        let id = id_for_check.clone();
                                                        move || list.with(|s| s.selection.is_selected(&id))
                                                    }
                                                    on:change={
                                                        let production = production_for_select.clone();
                                                        let root_id = root_id.clone();
                                                        move |_| ctrl.with_value(|c| {
                                                            c.toggle_select_one(&production, root_id.as_deref())
                                                        })
                                                    }
                                                />
                                            </Show>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <span style=indent>
                                                    {has_nested.then(|| {
                                                        let id = id_for_open.clone();
                                                        view! {
                                                            <span
                                                                class="tree-toggle"
                                                                on:click=move |_| ctrl.with_value(|c| c.toggle_opened(&id))
                                                            >
                                                                {
                                                                    let id = id_for_open.clone();
                                                                    move || if list.with(|s| s.is_opened(&id)) { "▾" } else { "▸" }
                                                                }
                                                            </span>
                                                        }
                                                    })}
                                                    {title.clone()}
                                                </span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>{production_key}</TableCell>
                                        <TableCell>
                                            {
                                                move || {
                                                    if list.with(|s| s.is_launching(&id_for_status)) {
                                                        "Launching"
                                                    } else {
                                                        status.title()
                                                    }
                                                }
                                            }
                                        </TableCell>
                                        <TableCell>{priority}</TableCell>
                                        <TableCell>
                                            <Show
                                                when=move || !list.with(|s| s.is_assigning_responsible(&id_for_assigning))
                                                fallback=|| view! { <Spinner /> }
                                            >
                                                {responsible.clone()}
                                            </Show>
                                        </TableCell>
                                        <TableCell>{issues}</TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>

            <Show when=move || filters.with(|s| s.pagination.has_more())>
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || filters.with(|s| s.is_infinity_scroll_load))
                    on_click=move |_| run(|c| Box::pin(async move { c.load_more_productions().await }))
                >
                    "Показать ещё"
                </Button>
            </Show>
        </div>
    }
}
