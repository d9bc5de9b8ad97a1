//! Persistent store for coding quizzes, their questions and answer options.

pub mod config;
pub mod db;
pub mod documents;
pub mod entity;
pub mod error;
pub mod import;
pub mod repository;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use store::QuizStore;
