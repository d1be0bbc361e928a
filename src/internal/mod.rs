//! Internal layer: remote model clients, configuration, prompt templates,
//! frame discovery, output layout, image normalization, request pacing, and
//! local media/dataset helpers.

pub mod ai;
pub mod config;
pub mod dataset;
pub mod frames;
pub mod imaging;
pub mod layout;
pub mod media;
pub mod prompt;
pub mod throttle;
