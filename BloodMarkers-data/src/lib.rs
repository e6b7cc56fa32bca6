// Blood Markers Data
// This crate handles data access for markers, measurements, notes and todos

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
