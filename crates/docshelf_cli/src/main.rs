use docshelf_client::DocshelfClient;
use docshelf_core::prelude::PublishRequest;
use docshelf_fs::FileSystemStore;
use docshelf_server::prelude::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docshelf")]
#[command(about = "Serve and publish versioned documentation archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the documentation server
    Serve {
        /// Directory holding one sub-directory per platform
        #[arg(long, env = "DOCSHELF_ROOT", default_value = ".")]
        root: PathBuf,

        /// File holding the shared publish token, created if missing
        #[arg(long, env = "DOCSHELF_TOKEN_FILE", default_value = "./token.txt")]
        token_file: PathBuf,

        /// Platforms to create and list (comma separated)
        #[arg(
            long,
            env = "DOCSHELF_PLATFORMS",
            value_delimiter = ',',
            default_value = "dokka,javadoc"
        )]
        platforms: Vec<String>,

        /// Platform every publish is stored under, or "provider" to use the request's provider
        #[arg(long, env = "DOCSHELF_NAMESPACE", default_value = "dokka")]
        namespace: NamespacePolicy,

        /// Directory served under /resources
        #[arg(long, env = "DOCSHELF_RESOURCES")]
        resources: Option<PathBuf>,

        /// Timeout in seconds for downloading a published archive
        #[arg(long, env = "DOCSHELF_FETCH_TIMEOUT", default_value_t = 300)]
        fetch_timeout: u64,

        #[arg(short, long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Ask a running server to download and store an archive
    Publish {
        /// Server URL
        #[arg(short, long, env = "DOCSHELF_URL", default_value = "http://localhost:8080")]
        url: String,

        #[arg(short, long, env = "DOCSHELF_TOKEN")]
        token: String,

        /// Documentation tool, e.g. "dokka" or "javadoc"
        #[arg(long, default_value = "dokka")]
        provider: String,

        /// Project name
        #[arg(long)]
        name: String,

        #[arg(long)]
        version: String,

        /// URL of the archive, its file name should be `{name}-{version}-{platform}.zip`
        #[arg(long)]
        source: String,
    },
    /// Download one file from a published archive
    Get {
        #[arg(short, long, env = "DOCSHELF_URL", default_value = "http://localhost:8080")]
        url: String,

        platform: String,
        project: String,
        version: String,

        /// Path inside the archive, defaults to the index page
        #[arg(default_value = "")]
        path: String,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            root,
            token_file,
            platforms,
            namespace,
            resources,
            fetch_timeout,
            port,
        } => {
            let store = FileSystemStore::new(root);
            let fetcher = HttpFetcher::new(Duration::from_secs(fetch_timeout))?;
            let config = DocshelfServerConfig {
                token_file,
                platforms,
                namespace,
                resources_dir: resources,
            };

            let app = DocshelfServer::new(config).build(store, fetcher).await?;

            let addr = format!("0.0.0.0:{port}");
            info!("Server listening on http://{addr}");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Publish {
            url,
            token,
            provider,
            name,
            version,
            source,
        } => {
            println!("Publishing {name} {version} from {source}...");

            let client = DocshelfClient::new(url);
            let receipt = client
                .publish(&PublishRequest {
                    token,
                    provider,
                    name,
                    version,
                    source,
                })
                .await?;

            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Commands::Get {
            url,
            platform,
            project,
            version,
            path,
            output,
        } => {
            let client = DocshelfClient::new(url);
            let data = client
                .fetch_document(&platform, &project, &version, &path)
                .await?;

            if let Some(parent) = output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&output, data).await?;

            println!("Saved to {output:?}");
        }
    }

    Ok(())
}
