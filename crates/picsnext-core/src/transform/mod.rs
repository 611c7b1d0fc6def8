//! Geometric transforms: quarter-turn rotation and cropping.
//!
//! # Transform Order
//!
//! When rendering, rotation is the first stage of the pipeline, ahead of
//! color adjustment, preset filters and blur. Cropping is not a render stage:
//! an applied crop copies pixels out of the rotated frame and the copy
//! becomes the new working frame.
//!
//! # Coordinate System
//!
//! - Rotation is clockwise in quarter turns
//! - Crop rectangles are in pixels of the buffer being cropped
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{apply_crop, InvalidCropGeometry};
pub use rotation::{apply_rotation, InvalidRotation, Rotation};
