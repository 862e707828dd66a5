// RealEstate Pro - API Server
// REST gateway over the clients collection, served with Axum

use estate_pro::api::{router, AppState};
use estate_pro::db::open_database;
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() {
    println!("🏠 RealEstate Pro - API Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Open database (the single owned connection; lives until shutdown)
    let db_path = env::var("CRM_DB").unwrap_or_else(|_| "crm.db".to_string());
    let conn = open_database(Path::new(&db_path)).expect("Failed to open database");
    println!("✓ Database opened: {}", db_path);

    // Create shared state and routes
    let state = AppState::new(conn);
    let app = router(state);

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/clients");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
