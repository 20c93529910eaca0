mod bound_box;
mod pixel_box;
mod ray;
mod value_range;
mod view_mode;

pub use bound_box::{BoundBox, BoundBoxIterator};
pub use pixel_box::{PixelBox, ViewportBox};
pub use ray::{Ray, RAY_LENGTH};
pub use value_range::ValueRange;
pub use view_mode::{AxisTransform, ViewMode};
