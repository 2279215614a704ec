//! # lql
//!
//! Interactive console for the List Query Language (LQL).
//!
//! Source code is submitted to a remote compilation service that runs six
//! ordered phases (lexer, parser, semantic, tac, optimizer, execution). This
//! crate holds the client side of that contract:
//!
//! - [grammar](lql::grammar): the client-local lexical tag grammar used for
//!   syntax highlighting.
//! - [normalize](lql::normalize): turns one pipeline response into what each
//!   phase panel displays.
//! - [controller](lql::controller): runs one request/response cycle and
//!   publishes the resulting state to observers.

pub mod lql;
