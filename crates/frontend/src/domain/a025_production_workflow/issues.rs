use chrono::{DateTime, Utc};
use contracts::domain::a025_production_workflow::{ProductionIssue, ProductionWorkflow};

/// Проблема производства с текстом для подсказки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionIssueItem {
    pub id: ProductionIssue,
    pub name: String,
}

/// Derives the issue list from the node's own flags.
///
/// Children are not inspected: nested problems come from the backend flag
/// `nested_production_component_has_issues`. The deadline check looks at the
/// date only; hiding it for Done/Canceled productions is up to the caller.
pub fn get_production_issues(
    production: &ProductionWorkflow,
    now: DateTime<Utc>,
) -> Vec<ProductionIssueItem> {
    let mut issues = Vec::new();

    if production.variant.id.is_none() {
        issues.push(ProductionIssueItem {
            id: ProductionIssue::UndefinedProduct,
            name: format!(
                "Undefined product from {}. Barcode {}",
                production
                    .order
                    .external_system_name
                    .as_deref()
                    .unwrap_or("-"),
                production.barcode.as_deref().unwrap_or("-")
            ),
        });
    }
    if production.deadline_at.is_some_and(|deadline| deadline < now) {
        issues.push(ProductionIssueItem {
            id: ProductionIssue::ProductionDeadlineExpired,
            name: "The deadline has been reached".to_string(),
        });
    }
    if production.is_manual_assignment_required {
        issues.push(ProductionIssueItem {
            id: ProductionIssue::TasksRequiringManualAssignment,
            name: "Manual assignment for a task required".to_string(),
        });
    }
    if production.is_any_task_time_limit_exceeded {
        issues.push(ProductionIssueItem {
            id: ProductionIssue::TaskTimeLimitExceeded,
            name: "The task tracker time has exceeded the task time limit".to_string(),
        });
    }
    if production.nested_production_component_has_issues {
        issues.push(ProductionIssueItem {
            id: ProductionIssue::IssuesInNestedComponents,
            name: "Nested production component has an issue".to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use contracts::domain::a025_production_workflow::{ProductionStatus, ProductionVariant};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn healthy() -> ProductionWorkflow {
        ProductionWorkflow {
            id: "pw".to_string(),
            variant: ProductionVariant {
                id: Some("v1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_production_has_no_issues() {
        assert!(get_production_issues(&healthy(), now()).is_empty());
    }

    #[test]
    fn test_all_flags_in_fixed_order() {
        let mut pw = healthy();
        pw.variant.id = None;
        pw.barcode = Some("4600001".to_string());
        pw.order.external_system_name = Some("Shopify".to_string());
        pw.deadline_at = Some(now() - Duration::days(1));
        pw.is_manual_assignment_required = true;
        pw.is_any_task_time_limit_exceeded = true;
        pw.nested_production_component_has_issues = true;

        let issues = get_production_issues(&pw, now());
        let ids: Vec<ProductionIssue> = issues.iter().map(|i| i.id).collect();
        assert_eq!(
            ids,
            vec![
                ProductionIssue::UndefinedProduct,
                ProductionIssue::ProductionDeadlineExpired,
                ProductionIssue::TasksRequiringManualAssignment,
                ProductionIssue::TaskTimeLimitExceeded,
                ProductionIssue::IssuesInNestedComponents,
            ]
        );
        assert_eq!(issues[0].name, "Undefined product from Shopify. Barcode 4600001");
    }

    #[test]
    fn test_expired_deadline_reported_for_terminal_status() {
        let mut pw = healthy();
        pw.status = ProductionStatus::Done;
        pw.deadline_at = Some(now() - Duration::hours(1));
        assert_eq!(get_production_issues(&pw, now()).len(), 1);

        pw.deadline_at = Some(now() + Duration::hours(1));
        assert!(get_production_issues(&pw, now()).is_empty());
    }

    #[test]
    fn test_children_are_not_aggregated() {
        let mut child = healthy();
        child.variant.id = None;
        let mut parent = healthy();
        parent.nested_workflows = vec![Arc::new(child)];
        assert!(get_production_issues(&parent, now()).is_empty());
    }
}
