use roomcast::{RelayServer, ServerConfig};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = ServerConfig::from_env();
    let server = RelayServer::new(config);

    if let Err(e) = server.run().await {
        log::error!("server error: {e}");
        std::process::exit(1);
    }
}
