//! Reusable file-backed stores shared by the server side and the client mirror.

pub mod json_map_store;
