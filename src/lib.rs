//! Load a `.env` file and run a project's `docker-compose` stack.
//!
//! `loadenv` reads `NAME=VALUE` pairs from an env file in the current project
//! directory and hands them to `docker-compose build .` and `docker-compose up`
//! as extra environment variables for those child processes. The variables are
//! never written into this process's own environment.
//!
//! # Modules
//!
//! - [`api`]: The `up` and `down` operations behind each command
//! - [`compose`]: Compose child process sequencing behind a runner seam
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`dotenv`]: Env file parsing
//! - [`error`]: Semantic error types for the application
//! - [`project`]: Locating the env file and `Dockerfile` in the project directory

pub mod api;
pub mod compose;
pub mod config;
pub mod dotenv;
pub mod error;
pub mod project;
