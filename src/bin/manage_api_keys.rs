//! CLI tool to manage API keys.
//!
//! Usage:
//!   cargo run --bin manage-api-keys -- list [--user <username>]
//!   cargo run --bin manage-api-keys -- activate-all [--user <username>]

use std::env;

use countries_gateway_lib::config::Config;
use countries_gateway_lib::db::{self, DbPool};
use countries_gateway_lib::models::ApiKeyListItem;
use countries_gateway_lib::services::api_key;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error preparing database: {}", e);
        std::process::exit(1);
    }

    let user_id = match parse_user_arg(&args) {
        Some(username) => Some(resolve_user(&pool, &username).await),
        None => None,
    };

    match command.as_str() {
        "list" | "ls" => list_keys(&pool, user_id.as_deref()).await,
        "activate-all" => activate_all(&pool, user_id.as_deref()).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_user_arg(args: &[String]) -> Option<String> {
    let mut i = 2;
    while i < args.len() {
        if args[i] == "--user" || args[i] == "-u" {
            if i + 1 < args.len() {
                return Some(args[i + 1].clone());
            }
            eprintln!("Error: --user requires a username");
            std::process::exit(1);
        }
        i += 1;
    }
    None
}

async fn resolve_user(pool: &DbPool, username: &str) -> String {
    match db::users::find_by_username(pool.connection(), username).await {
        Ok(Some(user)) => user.id,
        Ok(None) => {
            eprintln!("User '{}' not found.", username);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error looking up user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn list_keys(pool: &DbPool, user_id: Option<&str>) {
    let result = match user_id {
        Some(id) => api_key::list_keys(pool, id).await,
        None => api_key::list_all_keys(pool).await,
    };

    let keys = match result {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Error listing keys: {}", e);
            std::process::exit(1);
        }
    };

    if keys.is_empty() {
        println!("No API keys found.");
        return;
    }

    println!();
    println!(
        "{:<36} {:<16} {:<20} {:>8} {:<10}",
        "ID", "KEY", "NAME", "USES", "STATUS"
    );
    println!("{}", "-".repeat(94));

    for key in keys {
        let item = ApiKeyListItem::from(key);
        let status = if !item.is_active {
            "inactive"
        } else if item.is_expired {
            "expired"
        } else {
            "active"
        };

        let name = if item.name.chars().count() > 18 {
            format!("{}...", item.name.chars().take(15).collect::<String>())
        } else {
            item.name.clone()
        };

        println!(
            "{:<36} {:<16} {:<20} {:>8} {:<10}",
            item.id, item.key, name, item.usage_count, status
        );
    }
    println!();
}

async fn activate_all(pool: &DbPool, user_id: Option<&str>) {
    match api_key::activate_all(pool, user_id).await {
        Ok(0) => println!("No inactive API keys found."),
        Ok(count) => println!("Activated {} API key(s).", count),
        Err(e) => {
            eprintln!("Error activating keys: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: manage-api-keys <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list, ls [--user <username>]        List API keys");
    eprintln!("  activate-all [--user <username>]    Reactivate every inactive API key");
    eprintln!("  help                                Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  manage-api-keys list");
    eprintln!("  manage-api-keys list --user alice");
    eprintln!("  manage-api-keys activate-all --user alice");
    eprintln!();
}
