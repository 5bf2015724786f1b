#[path = "../helpers/mod.rs"]
mod helpers;

mod speech_coordinator_test;
