//! Concrete generative media providers.

pub mod gemini;
