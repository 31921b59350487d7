pub mod artifact;
pub mod compose;
pub mod cpu;
