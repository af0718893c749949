pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod palette;
pub mod renderer;
pub mod save;
pub mod snake;
pub mod storage;
pub mod terminal_runtime;
