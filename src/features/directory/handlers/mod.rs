pub mod map_handler;

pub use map_handler::{__path_get_map_scene, get_map_scene};
