pub mod audit;
pub mod classify;
pub mod rates;

pub use classify::GameType;
