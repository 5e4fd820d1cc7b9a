// HTTP handlers, one module per endpoint.

pub mod detect;
