//! A small server demonstrating handlers, form arguments and content negotiation.

use log::info;
use serde::Serialize;

use redhttp::server::{count_requests, escape_html, log_request, remove_trailing_slash};
use redhttp::{HttpResponse, HttpServer, Method, ServerConfig, StatusCode};

#[derive(Serialize)]
struct Stats {
    requests: u64,
    signature: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::default().with_addr("127.0.0.1:8081".parse()?);
    let mut server = HttpServer::new(config);

    server.add_handler(None, None, count_requests);
    server.add_handler(None, None, log_request);

    // The home page, in whichever format the client prefers
    server.add_handler(Some(Method::GET), Some("/"), |request, _context| {
        let format = request.negotiate_type("text/html,text/plain,application/json", "text/html");
        let greeting = "Hello from redhttp-rs";
        let response = match format.as_str() {
            "application/json" => HttpResponse::new(StatusCode::OK)
                .with_json(&serde_json::json!({ "greeting": greeting }))
                .ok()?,
            "text/plain" => HttpResponse::typed(StatusCode::OK, "text/plain").with_body_string(greeting),
            _ => HttpResponse::typed(StatusCode::OK, "text/html")
                .with_body_string(format!("<html><body><h1>{greeting}</h1></body></html>")),
        };
        Some(response.with_header("Vary", "Accept"))
    });

    // Everything below /files/ is echoed back
    server.add_handler(Some(Method::GET), Some("/files/*"), |request, _context| {
        let name = request.path_glob()?;
        Some(
            HttpResponse::typed(StatusCode::OK, "text/plain")
                .with_body_string(format!("You asked for {name}\n")),
        )
    });

    // Url-encoded forms are parsed into the request arguments
    server.add_handler(Some(Method::POST), Some("/greet"), |request, _context| {
        let Some(name) = request.argument("name") else {
            return Some(HttpResponse::error_page(
                StatusCode::BAD_REQUEST,
                "Missing the <code>name</code> argument.",
            ));
        };
        Some(
            HttpResponse::typed(StatusCode::OK, "text/html")
                .with_body_string(format!("<p>Hello, {}!</p>", escape_html(name))),
        )
    });

    server.add_handler(Some(Method::GET), Some("/stats"), |_request, context| {
        let stats = Stats {
            requests: context.request_count,
            signature: context.signature.clone(),
        };
        HttpResponse::new(StatusCode::OK).with_json(&stats).ok()
    });

    server.add_handler(Some(Method::POST), Some("/shutdown"), |_request, context| {
        info!("Shutdown requested");
        context.stop();
        Some(HttpResponse::typed(StatusCode::OK, "text/plain").with_body_string("Bye\n"))
    });

    server.add_handler(Some(Method::GET), None, remove_trailing_slash);

    server.start().await?;
    Ok(())
}
