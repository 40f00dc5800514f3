#![allow(clippy::all, clippy::pedantic)]

pub mod matcher_tests;
pub mod powerup_tests;
pub mod systems_tests;
pub mod time_tests;
