//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and the routing API key before
//! starting the server.

use dialoguer::{Confirm, Input, Password};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks the user for a bind address and port, offers to capture the Kakao
/// REST API key when the environment doesn't carry one, sets the
/// corresponding environment variables (`BIND_ADDR`, `PORT`,
/// `KAKAO_REST_API_KEY`), and delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Sinkhole Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    let api_key = if std::env::var("KAKAO_REST_API_KEY").is_ok() {
        String::new()
    } else {
        Password::new()
            .with_prompt("Kakao REST API key (leave empty to disable routing)")
            .allow_empty_password(true)
            .interact()
            .unwrap_or_default()
    };

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
        if !api_key.is_empty() {
            std::env::set_var("KAKAO_REST_API_KEY", &api_key);
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port_str}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
