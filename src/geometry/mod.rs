pub mod hit_testing;

pub use hit_testing::{distance_to_segment, hit_geometry, point_in_polygon, Contact};
