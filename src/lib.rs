pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod state;
pub mod validation;
