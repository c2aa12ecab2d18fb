pub mod header;
pub mod tab_bar;
pub mod text_panel;
pub mod upload_area;
pub mod search_options;
pub mod loader;
pub mod ai_insight;
pub mod results_grid;
