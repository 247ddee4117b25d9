pub mod arg_parser;
pub mod config;
pub mod device;
pub mod logger;
pub mod monitor;
pub mod render;
pub mod thermal;
