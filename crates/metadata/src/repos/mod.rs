//! Repository traits for metadata operations.

pub mod records;
pub mod users;

pub use records::RecordRepo;
pub use users::UserRepo;
