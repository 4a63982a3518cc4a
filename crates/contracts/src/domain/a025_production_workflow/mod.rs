//! Производственные процессы (production workflows): дерево, группировки,
//! запросы списка и сообщения live-канала.

pub mod aggregate;
pub mod enums;
pub mod groups;
pub mod live;
pub mod request;
pub mod response;

pub use aggregate::*;
pub use enums::*;
pub use groups::*;
