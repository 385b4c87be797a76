pub mod replay;
pub mod topics;
