pub mod camera;
pub mod model_loader;
