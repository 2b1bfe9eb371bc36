pub mod board;
pub mod citations;
pub mod cli;
pub mod config;
pub mod date;
pub mod district;
pub mod error;
pub mod gemini;
pub mod parse;
pub mod prompts;
pub mod render;
pub mod service;
pub mod status;
