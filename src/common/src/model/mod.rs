pub mod game;
pub mod record;
