pub mod enums;
mod daily_score;
mod exercise;
mod hydration;
mod meal;
mod medication_log;
mod patient;
mod record;
mod sleep;
mod user;
mod vitals;

pub use daily_score::*;
pub use enums::*;
pub use exercise::*;
pub use hydration::*;
pub use meal::*;
pub use medication_log::*;
pub use patient::*;
pub use record::*;
pub use sleep::*;
pub use user::*;
pub use vitals::*;
