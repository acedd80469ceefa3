// JSON-RPC tool server over stdin/stdout
pub mod handler;
pub mod protocol;
