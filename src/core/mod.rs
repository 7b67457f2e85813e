pub mod points_engine;

pub use points_engine::PointsEngine;
