// Library exports for Quill
// This allows integration tests and external code to use Quill modules

pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod posts;
pub mod routes;
pub mod state;
