//! Block document model used by the contract editor.

mod model;

pub use model::{Comment, Element, ElementsResponse, MoveDirection, ParagraphStyle};
