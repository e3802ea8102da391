//! # User Interface Module
//!
//! Web front end for the sentiment pipeline: an HTML page with a text box and a
//! score bar, plus the JSON endpoints it talks to. The handlers and server setup
//! live in the `routes` submodule.

pub mod routes;
