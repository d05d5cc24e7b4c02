//! Collaborators that observe or perturb the simulation without taking part
//! in its decisions: replay logging, fault injection, and validation.

pub mod chaos;
pub mod replay;
pub mod validator;
