pub mod buttons;
pub mod color_swatch;
pub mod preview;
pub mod source_card;
