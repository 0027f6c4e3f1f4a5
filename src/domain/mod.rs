//! Domain logic behind the HTTP surface
//!
//! Request relay from the translation endpoint to the external NMT script.

pub mod relay;
