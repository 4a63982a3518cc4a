//! Производственные процессы: фильтры, запрос списка, дерево и страница.

pub mod api;
pub mod filters;
pub mod issues;
pub mod tree;
pub mod ui;
