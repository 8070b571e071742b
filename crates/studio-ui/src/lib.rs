pub mod state;
pub mod theme;
pub mod images;
pub mod panels;
