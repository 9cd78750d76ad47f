pub mod consultations;
pub mod records;
