//! Message parsing: body decoding, multipart extraction, body selection and headers.

pub mod body;
pub mod decode;
pub mod extract;
pub mod header;
pub mod message;
