pub mod admissions;
pub mod import;
