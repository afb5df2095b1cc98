pub mod engine;
pub mod pricing;

pub use engine::ReservationService;
