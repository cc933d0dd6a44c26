pub mod countdown;
pub mod game_api;
pub mod game_thread;
