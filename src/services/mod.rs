// Services layer - Reusable logic with no store of its own
pub mod visibility;

pub use visibility::{await_visible, RetryPolicy, VisibilityError};
