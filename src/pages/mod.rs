pub mod assistant;
pub mod contacts;
pub mod settings;
