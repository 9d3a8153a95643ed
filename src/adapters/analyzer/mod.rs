//! External analyzer adapter

pub mod client;

pub use client::HttpAnalyzer;
