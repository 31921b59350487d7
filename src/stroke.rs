pub mod pointfile;
pub mod points;
