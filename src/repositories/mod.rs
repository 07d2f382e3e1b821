pub mod devices;
pub mod readings;

pub use devices::DeviceRepository;
pub use readings::ReadingRepository;
