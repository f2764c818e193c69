use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A row of the `boards` table.
///
/// Columns beyond `id` and `name` are passed through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Membership row linking a user to a board (`user_boards`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBoard {
    pub user_id: Uuid,
    pub board_id: Uuid,
}
