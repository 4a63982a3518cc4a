use serde::{Deserialize, Serialize};

/// Пользователь в том виде, в каком его отдаёт `/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub user_position_slots: Vec<UserPositionSlot>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Departments the user holds a position in, in slot order
    pub fn department_ids(&self) -> Vec<String> {
        self.user_position_slots
            .iter()
            .map(|slot| slot.position_slot.department_id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPositionSlot {
    pub position_slot: PositionSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSlot {
    pub department_id: String,
}
