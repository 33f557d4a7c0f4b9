//! Data types for the worksheet model and its option blocks.

mod cell;
mod content;
mod drawing;
mod filter;
mod formatting;
mod page;
mod rich_text;
mod selection;
mod sparkline;
mod table;
mod validation;

pub use cell::*;
pub use content::*;
pub use drawing::*;
pub use filter::*;
pub use formatting::*;
pub use page::*;
pub use rich_text::*;
pub use selection::*;
pub use sparkline::*;
pub use table::*;
pub use validation::*;
