use crate::domain::a025_production_workflow::ui::list::ProductionListPage;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <ProductionListPage />
        </ConfigProvider>
    }
}
