pub mod cargo;
pub mod fleet;
pub mod locations;
pub mod proximity;
pub mod vehicles;
