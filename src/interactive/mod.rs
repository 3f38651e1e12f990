//! Interactive window driving the renderer in real time

mod viewer;

pub use viewer::{InteractiveViewer, ViewerConfig};
