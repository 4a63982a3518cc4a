use serde::{Deserialize, Serialize};

/// Статус производства
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionStatus {
    #[default]
    #[serde(rename = "To_Do")]
    ToDo,
    #[serde(rename = "In_Progress")]
    InProgress,
    Stopped,
    Done,
    Canceled,
    #[serde(rename = "From_Stock")]
    FromStock,
    /// Transient status the backend reports while a launch job runs
    Launching,
}

impl ProductionStatus {
    pub const ALL: [ProductionStatus; 6] = [
        ProductionStatus::ToDo,
        ProductionStatus::Stopped,
        ProductionStatus::InProgress,
        ProductionStatus::Done,
        ProductionStatus::FromStock,
        ProductionStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStatus::ToDo => "To_Do",
            ProductionStatus::InProgress => "In_Progress",
            ProductionStatus::Stopped => "Stopped",
            ProductionStatus::Done => "Done",
            ProductionStatus::Canceled => "Canceled",
            ProductionStatus::FromStock => "From_Stock",
            ProductionStatus::Launching => "Launching",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProductionStatus::ToDo => "To Do",
            ProductionStatus::InProgress => "In progress",
            ProductionStatus::Stopped => "Stopped",
            ProductionStatus::Done => "Done",
            ProductionStatus::Canceled => "Canceled",
            ProductionStatus::FromStock => "From stock",
            ProductionStatus::Launching => "Launching",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductionStatus::Done | ProductionStatus::Canceled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Lowest,
    Low,
    #[default]
    Medium,
    High,
    Highest,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Lowest,
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Highest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Lowest => "Lowest",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Highest => "Highest",
        }
    }
}

/// Проблемы производства, которые умеет подсвечивать список
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionIssue {
    UndefinedProduct,
    ProductionDeadlineExpired,
    TaskTimeLimitExceeded,
    TasksRequiringManualAssignment,
    IssuesInNestedComponents,
}

impl ProductionIssue {
    pub const ALL: [ProductionIssue; 5] = [
        ProductionIssue::UndefinedProduct,
        ProductionIssue::ProductionDeadlineExpired,
        ProductionIssue::TaskTimeLimitExceeded,
        ProductionIssue::TasksRequiringManualAssignment,
        ProductionIssue::IssuesInNestedComponents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionIssue::UndefinedProduct => "undefined_product",
            ProductionIssue::ProductionDeadlineExpired => "production_deadline_expired",
            ProductionIssue::TaskTimeLimitExceeded => "task_time_limit_exceeded",
            ProductionIssue::TasksRequiringManualAssignment => "tasks_requiring_manual_assignment",
            ProductionIssue::IssuesInNestedComponents => "issues_in_nested_components",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProductionIssue::UndefinedProduct => "Undefined product",
            ProductionIssue::ProductionDeadlineExpired => "Production deadline expired",
            ProductionIssue::TaskTimeLimitExceeded => "Task time limit exceeded",
            ProductionIssue::TasksRequiringManualAssignment => "Tasks requiring manual assignment",
            ProductionIssue::IssuesInNestedComponents => "Issues in nested components",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    None,
    Order,
    Product,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionSortBy {
    Status,
    Progress,
    CreatedAt,
    StartedAt,
    #[default]
    DeadlineAt,
    #[serde(rename = "priority")]
    OrderPriority,
    #[serde(rename = "to_stock")]
    MakeToStock,
    Responsible,
    EstimatedTime,
}

impl ProductionSortBy {
    /// Варианты, доступные в выпадающем списке сортировки
    pub const OPTIONS: [ProductionSortBy; 8] = [
        ProductionSortBy::CreatedAt,
        ProductionSortBy::DeadlineAt,
        ProductionSortBy::EstimatedTime,
        ProductionSortBy::OrderPriority,
        ProductionSortBy::Progress,
        ProductionSortBy::Responsible,
        ProductionSortBy::StartedAt,
        ProductionSortBy::Status,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ProductionSortBy::Status => "Status",
            ProductionSortBy::Progress => "Progress",
            ProductionSortBy::CreatedAt => "Created at",
            ProductionSortBy::StartedAt => "Started at",
            ProductionSortBy::DeadlineAt => "Deadline",
            ProductionSortBy::OrderPriority => "Order priority",
            ProductionSortBy::MakeToStock => "Make to stock",
            ProductionSortBy::Responsible => "Responsible",
            ProductionSortBy::EstimatedTime => "Estimated time",
        }
    }
}

/// Режим фильтра "показывать завершённые"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowCompletedPeriod {
    All,
    #[default]
    Some,
    #[serde(rename = "none")]
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionSource {
    Manual,
    External,
}

impl ProductionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionSource::Manual => "Manual",
            ProductionSource::External => "External",
        }
    }
}

/// Every filter criterion the production list understands. The serde names are
/// the keys used in the request body and in the saved user filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCriterion {
    Client,
    Vendor,
    Issues,
    Source,
    Option,
    Product,
    LimitBy,
    TaskKey,
    OrderKey,
    #[serde(rename = "to_stock")]
    MakeToStock,
    CreatedBy,
    #[serde(rename = "created_at")]
    CreatedDate,
    #[serde(rename = "started_at")]
    StartedDate,
    Responsible,
    #[serde(rename = "deadline_at")]
    DeadlineDate,
    ProductType,
    SearchQuery,
    #[serde(rename = "completed_at")]
    CompletedDate,
    PrimaryClient,
    OrderPriority,
    ProductionKey,
    ShowCompleted,
    ShowAllSubItems,
    ProductionStatus,
    #[serde(rename = "workflow_template_name")]
    WorkflowName,
    InvolvedDepartment,
    ProductionPriority,
    ExternalOrderNumber,
    #[serde(rename = "product_configuration_name")]
    ConfigurationName,
    MarketplaceOrderNumber,
    ExcludeUnknownProducts,
    ResponsibilityDepartment,
    FirstWorkflowEstimatedTime,
    UsersAssignedToProductionTasks,
    #[serde(rename = "show_parent_items_if_sub_items_match_filters")]
    ShowParentIfSubItemsMatchFilters,
}

impl FilterCriterion {
    pub const ALL: [FilterCriterion; 35] = [
        FilterCriterion::Client,
        FilterCriterion::Vendor,
        FilterCriterion::Issues,
        FilterCriterion::Source,
        FilterCriterion::Option,
        FilterCriterion::Product,
        FilterCriterion::LimitBy,
        FilterCriterion::TaskKey,
        FilterCriterion::OrderKey,
        FilterCriterion::MakeToStock,
        FilterCriterion::CreatedBy,
        FilterCriterion::CreatedDate,
        FilterCriterion::StartedDate,
        FilterCriterion::Responsible,
        FilterCriterion::DeadlineDate,
        FilterCriterion::ProductType,
        FilterCriterion::SearchQuery,
        FilterCriterion::CompletedDate,
        FilterCriterion::PrimaryClient,
        FilterCriterion::OrderPriority,
        FilterCriterion::ProductionKey,
        FilterCriterion::ShowCompleted,
        FilterCriterion::ShowAllSubItems,
        FilterCriterion::ProductionStatus,
        FilterCriterion::WorkflowName,
        FilterCriterion::InvolvedDepartment,
        FilterCriterion::ProductionPriority,
        FilterCriterion::ExternalOrderNumber,
        FilterCriterion::ConfigurationName,
        FilterCriterion::MarketplaceOrderNumber,
        FilterCriterion::ExcludeUnknownProducts,
        FilterCriterion::ResponsibilityDepartment,
        FilterCriterion::FirstWorkflowEstimatedTime,
        FilterCriterion::UsersAssignedToProductionTasks,
        FilterCriterion::ShowParentIfSubItemsMatchFilters,
    ];
}
