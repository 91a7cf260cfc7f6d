pub mod location_panel;
pub mod map_view;
pub mod navbar;
pub mod sidebar;
pub mod style_selector;
