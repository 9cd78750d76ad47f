mod consultation;

pub use consultation::ConsultationService;
