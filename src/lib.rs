//! Two terminal arcade games (obstacle dodging and Snake) sharing a themed
//! "special effect" mechanic: touching a special entity pauses play while a
//! particle effect and a message overlay run for a fixed window.

pub mod config;
pub mod controller;
pub mod dodge;
pub mod effects;
pub mod entities;
pub mod error;
pub mod message;
pub mod snake;
pub mod timeline;

pub use error::{ArcadeError, Result};
