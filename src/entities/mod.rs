pub mod cargo;
pub mod location;
pub mod vehicle;
