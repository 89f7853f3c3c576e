// Fixed-width reflow of teletext subpages.
// Frontends only consume `Layout::rows`; the grouping rules live in `reflow`.

pub mod reflow;

pub use reflow::{layout, Layout, LayoutError, Row};
