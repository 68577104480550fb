pub mod config;
pub mod inspect;
pub mod patches;
pub mod takes;
