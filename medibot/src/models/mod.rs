mod qa_record;

pub use qa_record::*;
