mod constellation;
mod devices;
mod types;

pub use constellation::{generate_constellation, OrbitTemplate};
pub use devices::{generate_device_grid, level_latitudes, longitude_resolution, LEVEL_COUNT};
pub use types::{ConstellationShape, DeviceSample, SatelliteOrbit};
