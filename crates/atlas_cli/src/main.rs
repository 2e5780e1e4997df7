use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use atlas_core::{workspace::slugify, Error, Result, Workspace};
use atlas_inference::{ArticleGenerator, GenerationBackend, OllamaBackend, OllamaConfig};
use atlas_render::render_article;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate and render automation atlas articles", long_about = None)]
struct Cli {
    /// Workspace root holding search-digests/, json-files/ and outputs/
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Generation endpoint override
    #[arg(long)]
    endpoint: Option<String>,
    /// Model identifier override
    #[arg(long)]
    model: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate an article for a topic, grounded in a search digest
    Generate {
        /// Subject of automation, e.g. "Nuclear Power"
        topic: String,
        /// Digest file name under search-digests/
        digest: String,
        /// Output file name under json-files/ (defaults to the topic slug)
        output: Option<String>,
    },
    /// Render a generated article to outputs/<name>.html
    Render {
        /// Article name under json-files/, without extension
        name: String,
    },
    /// List available digests and generated articles
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    // try_parse so bad arguments exit 1 like every other terminal failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
        Err(help) => {
            print!("{help}");
            return ExitCode::SUCCESS;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Critical failure: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let workspace = Workspace::new(&cli.root);
    workspace.ensure_layout()?;

    match cli.command {
        Commands::Generate {
            topic,
            digest,
            output,
        } => {
            if topic.trim().is_empty() {
                return Err(Error::InputError("topic must not be empty".to_string()));
            }
            if digest.trim().is_empty() {
                return Err(Error::InputError("digest file name must not be empty".to_string()));
            }
            // Eager input checks: the digest is read in full before any
            // backend work starts.
            let digest_text = workspace.read_digest(&digest)?;

            let mut config = OllamaConfig::default();
            if let Some(endpoint) = cli.endpoint {
                config.endpoint = endpoint;
            }
            if let Some(model) = cli.model {
                config.model = model;
            }
            let backend = Arc::new(OllamaBackend::new(config));
            info!("🧠 Generation backend ready (using {})", backend.name());

            let generator = ArticleGenerator::new(backend);
            let article = generator.generate(&topic, &digest_text).await?;

            let output = output.unwrap_or_else(|| format!("{}.json", slugify(&topic)));
            let path = workspace.write_article(&output, &article)?;
            info!("📄 Successfully generated {}", path.display());
            println!("{}", path.display());
        }
        Commands::Render { name } => {
            let article = workspace.read_article(&format!("{name}.json"))?;
            let html = render_article(&article);
            let path = workspace.write_page(&format!("{name}.html"), &html)?;
            info!("🖼️ Rendered {}", path.display());
            println!("{}", path.display());
        }
        Commands::List => {
            println!("Digests:");
            for name in workspace.list_digests()? {
                println!("  {name}");
            }
            println!("Articles:");
            for name in workspace.list_articles()? {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
