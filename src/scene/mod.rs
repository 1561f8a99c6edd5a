//! Scene geometry module
//!
//! Pure mapping from camera parameters to the visualization rig: camera
//! position, guide rings, and the subject billboard. Nothing in here draws
//! or touches the network.

pub mod rig;
