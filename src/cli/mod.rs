mod root;
mod screens;
mod submit;

pub use root::Cli;
