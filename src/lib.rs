pub mod config;
pub mod consts;
pub mod dice;
pub mod gateway;
pub mod instructions;
pub mod scrape;
pub mod slack;
pub mod wiki;
