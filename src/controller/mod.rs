pub mod audio_controller;
pub mod handlers;
pub mod poll_timer;

pub use audio_controller::AudioController;
