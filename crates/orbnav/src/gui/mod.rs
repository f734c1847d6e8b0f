pub mod app;
pub mod orbs;
pub mod theme;
