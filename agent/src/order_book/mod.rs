mod shared_book;

pub use shared_book::{BoardSnapshot, BoardStore};
