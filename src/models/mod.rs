pub mod device;
pub mod reading;

pub use device::Device;
pub use reading::{NewReading, Reading, ReadingPayload, ReadingsQuery, UpdateParams};
