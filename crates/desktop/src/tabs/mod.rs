pub mod about_tab;
pub mod appearance_tab;
pub mod main_tab;
