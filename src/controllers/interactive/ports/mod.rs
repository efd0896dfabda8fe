//! Port definitions for the render scheduler.
//!
//! Contains the interface between the coordinator and the presentation
//! surface it paints onto.

pub mod presenter_port;
