// Layout engine: text measurement, section placement and pagination.
// Everything here is synchronous and deterministic; callers holding the
// session lock run it directly, no await points inside.

pub mod font_metrics;
pub mod measure;
pub mod paginator;
pub mod paint;
pub mod placement;

pub use font_metrics::{default_page_config, PageConfig};
pub use measure::{StaticMeasurer, TextMeasurer};
pub use paginator::paginate;
pub use paint::{DrawOp, PaintPage, PaintProgram};
pub use placement::{MoveDirection, PlacementModel, MIN_PAGES};
