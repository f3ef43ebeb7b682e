/// Declares a closed set of values stored as short strings in a VARCHAR
/// column. Parsing an unknown value yields a validation error naming `$what`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($what:literal) {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::BookingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(crate::errors::BookingError::Validation(format!(
                        "unknown {} '{}'",
                        $what, other
                    ))),
                }
            }
        }
    };
}

pub mod appointments;
pub mod audit_logs;
pub mod availability;
pub mod consultations;
pub mod notifications;
pub mod specializations;
pub mod users;
pub mod virtual_links;

pub mod feedback;
pub mod recurring_appointments;
pub mod waitlist;
