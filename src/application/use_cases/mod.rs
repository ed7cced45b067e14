pub mod domains;
pub mod edge;
