pub mod params;
pub mod peaks;
pub mod plan;
pub mod series;
