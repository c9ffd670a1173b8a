pub mod contact;
pub mod migrate;
