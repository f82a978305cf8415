pub mod amounts;
pub mod dates;
pub mod general;
pub mod tables;
