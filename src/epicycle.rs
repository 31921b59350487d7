pub mod rig;
pub mod sequencer;
