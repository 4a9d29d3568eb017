//! Terminal user interfaces.

pub mod board_view;
