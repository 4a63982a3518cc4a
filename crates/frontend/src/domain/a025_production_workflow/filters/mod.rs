pub mod request;
pub mod schema;
pub mod state;

pub use request::{prepare_request_body, set_user_filters};
pub use schema::{FilterValue, ProductionFilters};
pub use state::ProductionFiltersState;
