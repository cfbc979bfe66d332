#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use planboard::crud::BoardSnapshot;
    use planboard::http_api;
    use planboard::persistence::load_board_from_json;

    tracing_subscriber::fmt().init();

    let addr: SocketAddr = std::env::var("PLANBOARD_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let data_path =
        std::env::var("PLANBOARD_DATA").unwrap_or_else(|_| "data/board.json".to_string());
    let seed = match load_board_from_json(&data_path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("could not read {data_path} ({err}), using built-in demo data");
            BoardSnapshot::demo()
        }
    };

    #[cfg(feature = "sqlite")]
    let state = match std::env::var("PLANBOARD_DB") {
        Ok(db_path) => {
            let store = std::sync::Arc::new(planboard::SqliteBoardStore::new(db_path)?);
            http_api::AppState::with_store(seed, store)
        }
        Err(_) => http_api::AppState::new(seed),
    };
    #[cfg(not(feature = "sqlite"))]
    let state = http_api::AppState::new(seed);

    println!("planboard HTTP API listening on http://{addr}");
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
