pub mod admin;
pub mod auth;
pub mod comments;
pub mod health;
pub mod image;
pub mod manga;
pub mod progress;
pub mod reader;
pub mod reviews;
