mod qa_records;

pub use qa_records::QaRecordRepository;
