use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Asha Verma",
        "roll_no": 1,
        "attendance_percentage": 50.0
    })
)]
pub struct Student {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Asha Verma")]
    pub name: String,

    #[schema(example = 1)]
    pub roll_no: u32,

    /// Present-ratio over ALL of this student's recorded sessions, any
    /// subject. Maintained by the after-insert trigger, never by handlers.
    #[schema(example = 50.0)]
    pub attendance_percentage: f64,
}
