//! JSON API for Colloq, a small event discovery and registration service.
//!
//! Users sign up and log in for a session token, organizers create events
//! through a validated form, and anyone can browse and filter the event list.
//! Authenticated users register for events and see them on their dashboard.

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
