pub mod config;
pub mod manifest;
pub mod plan;
pub mod stack;
pub mod template;
