mod common;
mod narrative;
mod service;
