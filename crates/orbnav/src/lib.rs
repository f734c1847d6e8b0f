pub mod config;
pub mod events;
pub mod gui;
pub mod site;
pub mod sys;
