use crate::schema::users;
use chrono::NaiveDateTime;

string_enum! {
    pub enum Role ("role") {
        Patient => "patient",
        Doctor => "doctor",
    }
}

string_enum! {
    pub enum UserStatus ("user status") {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn is(&self, role: Role) -> bool {
        self.role == role.as_str()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active.as_str()
    }
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BookingError;

    #[test]
    fn role_parses_known_values_only() {
        assert_eq!("doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!("patient".parse::<Role>().unwrap(), Role::Patient);
        match "nurse".parse::<Role>() {
            Err(BookingError::Validation(msg)) => assert_eq!(msg, "unknown role 'nurse'"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn status_is_case_sensitive() {
        assert!("Active".parse::<UserStatus>().is_err());
        assert_eq!(UserStatus::Suspended.to_string(), "suspended");
    }
}
