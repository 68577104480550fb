pub mod patches;
pub mod takes;
