//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the Supabase clients and the map/PDF rendering collaborators.

pub mod map_engine;
pub mod pdf;
pub mod supabase;
