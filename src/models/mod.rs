pub mod delivery;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod settings;
pub mod user;
