use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Probe CLI for the Storefront Edge Gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the security response headers as JSON
    Headers,
    /// Print the Content-Security-Policy one directive per line
    Csp,
    /// Fetch twice and check nonce format and uniqueness
    Nonce,
}

const SECURITY_HEADER_NAMES: [&str; 9] = [
    "content-security-policy",
    "x-frame-options",
    "x-content-type-options",
    "referrer-policy",
    "x-dns-prefetch-control",
    "permissions-policy",
    "x-xss-protection",
    "strict-transport-security",
    "x-request-id",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Headers => {
            let res = client.get(&cli.url).send().await?;
            let mut out = Map::new();
            for name in SECURITY_HEADER_NAMES {
                if let Some(value) = res.headers().get(name) {
                    out.insert(
                        name.to_string(),
                        Value::String(value.to_str().unwrap_or("<non-ascii>").to_string()),
                    );
                }
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);
        }
        Commands::Csp => {
            let res = client.get(&cli.url).send().await?;
            match res.headers().get("content-security-policy") {
                Some(value) => {
                    for directive in value.to_str()?.split("; ") {
                        println!("{directive}");
                    }
                }
                None => {
                    eprintln!("Error: no Content-Security-Policy header in response");
                    std::process::exit(1);
                }
            }
        }
        Commands::Nonce => {
            let first = fetch_nonce(&client, &cli.url).await?;
            let second = fetch_nonce(&client, &cli.url).await?;

            let well_formed = |n: &str| {
                n.len() == 32
                    && n.chars()
                        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
            };

            println!("first:  {first}");
            println!("second: {second}");
            if !well_formed(&first) || !well_formed(&second) {
                eprintln!("Error: nonce is not 32 lowercase hex characters");
                std::process::exit(1);
            }
            if first == second {
                eprintln!("Error: nonce repeated across requests");
                std::process::exit(1);
            }
            println!("ok: unique, 32 lowercase hex");
        }
    }

    Ok(())
}

/// Extract the 'nonce-…' value from the CSP script-src directive.
async fn fetch_nonce(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let res = client.get(url).send().await?;
    let csp = res
        .headers()
        .get("content-security-policy")
        .ok_or("no Content-Security-Policy header in response")?
        .to_str()?;

    let start = csp.find("'nonce-").ok_or("no nonce token in CSP")? + "'nonce-".len();
    let rest = &csp[start..];
    let end = rest.find('\'').ok_or("unterminated nonce token")?;
    Ok(rest[..end].to_string())
}
