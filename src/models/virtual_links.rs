use crate::schema::virtual_links;
use chrono::NaiveDateTime;

#[derive(Queryable, Debug, Clone)]
pub struct VirtualLink {
    pub id: u64,
    pub appointment_id: u64,
    pub url: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "virtual_links"]
pub struct NewVirtualLink {
    pub appointment_id: u64,
    pub url: String,
    pub expires_at: NaiveDateTime,
}
