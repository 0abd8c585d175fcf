use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity every store call is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
}
