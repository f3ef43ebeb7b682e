//! Entity store accessors: uniqueness checks, existence checks and the
//! delete policies that the foreign keys alone cannot explain to a caller.

pub mod availability;
pub mod feedback;
pub mod recurring;
pub mod specializations;
pub mod users;
pub mod waitlist;
