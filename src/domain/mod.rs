pub mod patch;
pub mod takes;
