pub mod crop;
#[cfg(feature = "desktop")]
pub mod detector;
#[cfg(feature = "desktop")]
pub mod face_mesh;
pub mod keypoint;
#[cfg(feature = "desktop")]
pub mod preprocess;

pub use crop::{face_region_from_pose, CropRegion};
#[cfg(feature = "desktop")]
pub use detector::PoseDetector;
#[cfg(feature = "desktop")]
pub use face_mesh::FaceMeshDetector;
pub use keypoint::{FaceMesh, Keypoint, KeypointIndex, Pose};
#[cfg(feature = "desktop")]
pub use preprocess::{preprocess_for_face_mesh, preprocess_for_movenet};
