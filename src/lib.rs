pub mod assignment;
pub mod config;
pub mod export;
pub mod fixtures;
pub mod goals;
pub mod loaders;
pub mod model;
pub mod pipeline;
pub mod reference;
pub mod sample;
pub mod stadiums;
pub mod validate;
