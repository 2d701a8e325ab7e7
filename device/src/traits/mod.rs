//! Collaborators the CTD driver talks to but does not own.

pub mod clock;
pub mod logger;
pub mod serial;
