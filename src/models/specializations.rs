use crate::schema::{doctor_specializations, specializations};

#[derive(Queryable, Debug, Clone)]
pub struct Specialization {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Insertable)]
#[table_name = "specializations"]
pub struct NewSpecialization {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Queryable, Insertable, Debug)]
#[table_name = "doctor_specializations"]
pub struct DoctorSpecialization {
    pub doctor_id: u64,
    pub specialization_id: u64,
}
