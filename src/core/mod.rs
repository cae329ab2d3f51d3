// Core modules implementing the record format, cursor, decoder, and error modeling.
pub mod cipher;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod hexdump;
pub mod layout;
pub mod record;
pub mod schema;
