pub mod bootstrap;
pub mod http_server;
