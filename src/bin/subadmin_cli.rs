//! subadmin-cli — command line access to the subscription admin API
//!
//! Usage:
//!   subadmin-cli health                          Check that the API server is reachable
//!   subadmin-cli login <user> <password>         Log in and store the session token
//!   subadmin-cli get <endpoint>                  GET an endpoint and print the JSON

use std::sync::Arc;
use subscription_admin::session::{KeyringTokenStore, LoggingSessionObserver};
use subscription_admin::{ApiRequest, Error, GatewayClient, Method, Startup};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (base_url, args) = split_base_url(args);
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    if let Err(e) = run(base_url, &args).await {
        eprintln!("error: {:#}", e);
        if let Some(Error::Authentication { .. }) = e.downcast_ref::<Error>() {
            eprintln!("hint: the session has ended; run `subadmin-cli login <user> <password>`");
        }
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"subadmin-cli — subscription admin API client

USAGE:
    subadmin-cli [--base-url <url>] <COMMAND> [ARGS]

COMMANDS:
    health                          Check that the API server is reachable
    status                          Probe the server and report the stored session
    login <user> <password>         Log in and store the session token
    logout                          Forget the stored session token
    passwd <user> <current> <new>   Change a staff password
    get <endpoint>                  GET an endpoint, print the JSON
    delete <endpoint>               DELETE an endpoint
    post <endpoint> <json>          POST a JSON body
    put <endpoint> <json>           PUT a JSON body
    sync                            Resync the delivery scheduler
    version                         Show version information
    help                            Show this help message

ENVIRONMENT:
    SUBADMIN_HTTP_TIMEOUT_SECS      Per-attempt timeout (default 30)
    SUBADMIN_MAX_ATTEMPTS           Attempts per call (default 2)
    SUBADMIN_RETRY_DELAY_MS         Backoff unit (default 1000)
    SUBADMIN_PROXY_URL              HTTP proxy
    RUST_LOG                        Log filter (default info)"#
    );
}

fn split_base_url(args: Vec<String>) -> (Option<String>, Vec<String>) {
    let mut base_url = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--base-url" {
            base_url = iter.next();
        } else if let Some(v) = arg.strip_prefix("--base-url=") {
            base_url = Some(v.to_string());
        } else {
            rest.push(arg);
        }
    }
    (base_url, rest)
}

fn build_client(base_url: Option<String>) -> subscription_admin::Result<GatewayClient> {
    let mut builder = GatewayClient::builder()
        .token_store(Arc::new(KeyringTokenStore::new()))
        .observer(Arc::new(LoggingSessionObserver));
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    builder.build()
}

fn arg<'a>(args: &'a [String], idx: usize, name: &str) -> anyhow::Result<&'a str> {
    args.get(idx)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("missing argument <{}> (see `subadmin-cli help`)", name))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

async fn run(base_url: Option<String>, args: &[String]) -> anyhow::Result<()> {
    match args[0].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        "version" | "--version" | "-V" => {
            println!("subadmin-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let client = build_client(base_url)?;

    match args[0].as_str() {
        "health" => {
            if client.probe().await {
                println!("ok: {}", client.base_url());
            } else {
                anyhow::bail!("API server at {} is not reachable", client.base_url());
            }
        }
        "status" => match client.bootstrap().await? {
            Startup::Authenticated => println!("logged in ({})", client.base_url()),
            Startup::LoginRequired => println!("not logged in ({})", client.base_url()),
        },
        "login" => {
            let user = arg(args, 1, "user")?;
            let password = arg(args, 2, "password")?;
            client.login(user, password).await?;
            println!("logged in as {}", user);
        }
        "logout" => {
            client.logout().await?;
            println!("logged out");
        }
        "passwd" => {
            let user = arg(args, 1, "user")?;
            let current = arg(args, 2, "current")?;
            let new = arg(args, 3, "new")?;
            client.session().restore().await?;
            client.change_password(user, current, new).await?;
            println!("password changed");
        }
        "sync" => {
            client.session().restore().await?;
            print_json(&client.sync_scheduler().await?)?;
        }
        cmd @ ("get" | "delete" | "post" | "put") => {
            let method: Method = cmd.parse()?;
            let endpoint = arg(args, 1, "endpoint")?;
            let mut request = ApiRequest::new(method, endpoint);
            if method.carries_body() {
                let raw = arg(args, 2, "json")?;
                request = request.body(serde_json::from_str(raw)?);
            }
            client.session().restore().await?;
            print_json(&client.call(request).await?)?;
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
