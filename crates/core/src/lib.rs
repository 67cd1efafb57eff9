//! Face detection and annotation core.
//!
//! Domain traits live under each module's `domain`, adapters for concrete
//! libraries under `infrastructure`. [`pipeline::detect_faces_use_case`]
//! wires them into a per-interaction request handler.

pub mod annotation;
pub mod detection;
pub mod export;
pub mod pipeline;
pub mod shared;
pub mod source;
