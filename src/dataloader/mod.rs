pub mod ade20k;
pub mod config;
pub mod dataloader;
pub mod error;
pub mod info;
pub mod layout;
pub mod mode;
pub mod sample;
pub mod transform;
