pub mod payer;
pub mod points;
pub mod timestamp;

pub use payer::Payer;
pub use points::Points;
pub use timestamp::Timestamp;
