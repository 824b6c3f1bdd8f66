pub mod device;
pub mod profile;

pub use device::SimulatedInventory;
pub use profile::SimulationConfig;
