use macros::nutype_string;

pub mod contact;
pub mod email_address;
mod macros;
pub mod pagination;

nutype_string!(SearchTerm(validate(len_char_min = 1, len_char_max = 256)));
