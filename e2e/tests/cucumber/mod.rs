
pub use world::ProductWorld;
