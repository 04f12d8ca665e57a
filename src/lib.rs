pub mod args;
pub mod catalog;
pub mod encoding;
pub mod engine;
pub mod errors;
pub mod reference;
pub mod render;
pub mod rules;
