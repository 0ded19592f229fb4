use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Subject {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Math")]
    pub name: String,
}
