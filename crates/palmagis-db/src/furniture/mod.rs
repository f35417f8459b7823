//! Database operations for the `furniture` table.

mod read;
mod types;
mod write;

pub use read::{get_furniture, list_furniture, list_furniture_missing_coordinates};
pub use types::FurnitureRow;
pub use write::update_furniture_coordinates_if_exists;
