pub mod events;
pub mod scenario;
pub mod time_series;
pub mod trajectory;
