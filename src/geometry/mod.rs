pub mod axis_box;
pub mod path;

pub use axis_box::AxisBox;
pub use path::Path;
