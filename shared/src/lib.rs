//! Types shared by the EduHub client library and its terminal front-end:
//! backend wire formats, the canonical [`Role`](types::Role), the
//! credential-to-[`Session`](session::Session) decoder and the TOML config.

pub mod config;
pub mod session;
pub mod types;

pub use self::session::{Session, SessionError, decode_session, try_decode_session};
