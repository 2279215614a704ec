pub mod app;
pub mod console_main;
pub mod editor;
pub mod panels;
pub mod theme;
pub mod ui;
pub mod viewer;

#[cfg(test)]
pub mod tests;
