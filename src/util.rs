pub mod callback;
pub mod observable;
