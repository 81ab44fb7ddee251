pub mod campaign;
pub mod client;
pub mod money;
pub mod proposal;
