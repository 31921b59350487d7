pub mod component;
pub mod dft;
pub mod idft;
