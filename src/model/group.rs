use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Group {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "North")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SubGroup {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(example = "North-A")]
    pub name: String,
    #[schema(example = 1)]
    pub group_id: i64,
}
