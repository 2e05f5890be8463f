pub mod analysis;
pub mod health;
