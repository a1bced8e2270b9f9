pub mod app;
pub mod audio_panel;
