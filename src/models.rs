use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "hunter2")]
    pub password: String,
}
