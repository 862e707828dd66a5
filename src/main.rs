use anyhow::Result;

fn main() -> Result<()> {
    run_ui_mode()
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    use estate_pro::ui::{self, App};
    use estate_pro::ClientsApi;
    use std::env;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    let base_url =
        env::var("CRM_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!("🏠 RealEstate Pro - Client Manager\n");

    let runtime = tokio::runtime::Runtime::new()?;
    let api = Arc::new(Mutex::new(ClientsApi::new(&base_url)));

    // Initial fetch; a failure still opens the UI with the error shown and
    // 'r' available to retry.
    println!("📇 Loading clients from {} ...", base_url);
    let initial = {
        let api = Arc::clone(&api);
        runtime.block_on(async move { api.lock().await.refresh().await })
    };

    let mut app = match initial {
        Ok(clients) => {
            println!("✓ Loaded {} clients\n", clients.len());
            App::new(clients)
        }
        Err(err) => {
            eprintln!("❌ Could not reach the gateway: {}", err);
            eprintln!("   Start it with: cargo run --bin estate-server --features server\n");
            App::with_load_error(err.to_string())
        }
    };

    println!("Starting UI... (Press 'q' to quit)\n");
    ui::run_ui(&mut app, api, runtime.handle().clone())?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run the API server: cargo run --bin estate-server --features server");
    std::process::exit(1);
}
