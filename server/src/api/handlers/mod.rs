//! Handler-Module der Medien-API

pub mod auth;
pub mod lizenzen;
pub mod media;
pub mod parameters;
pub mod register;
