//! Core graph data structures: pages, block trees, and the text passes over them

mod block;
pub mod links;
mod page;
pub mod walk;

#[cfg(test)]
mod tests;

pub use block::{Block, BlockLink, PageHandle};
pub use links::canonical;
pub use page::{format_journal_title, JournalDay, Page};
pub use walk::{flatten, Walk};
