pub mod form;
pub mod state;
