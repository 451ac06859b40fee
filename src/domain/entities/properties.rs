use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::properties;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable, Insertable)]
#[diesel(table_name = properties)]
pub struct PropertyEntity {
    pub id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub price: Option<Decimal>,
    pub date_posted: DateTime<Utc>,
}
