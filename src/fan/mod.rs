//! Fan speed vocabulary and the fan entity

pub mod entity;
pub mod speed;

pub use entity::{DispatchState, FanEntity, FanEntityState, FanFeature, Nrf905Fan};
pub use speed::{level_count, percentage_of, SpeedLevel};
